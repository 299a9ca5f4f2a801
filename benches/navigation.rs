use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use data_grid::config::config::GridConfig;
use data_grid::data::column::GridColumn;
use data_grid::data::datatable::{DataRow, DataTable, DataValue};
use data_grid::data::grouping::GroupingView;
use data_grid::ui::actions::GridAction;
use data_grid::ui::grid_manager::GridManager;

fn create_test_data(rows: usize) -> DataTable {
    let mut table = DataTable::new("bench");

    table.add_column(GridColumn::new("book").with_width(20));
    table.add_column(GridColumn::new("desk").with_width(12));
    table.add_column(GridColumn::new("value").with_width(10));
    table.add_column(GridColumn::new("status").with_width(10));

    let book_values = [
        "Commodities Trading",
        "Equity Trading",
        "FX Trading",
        "Bond Trading",
        "Derivatives",
        "Options",
        "Futures",
        "ETF Trading",
        "Structured Products",
        "Money Markets",
    ];

    for i in 0..rows {
        let book = book_values[i % book_values.len()].to_string();
        let row = DataRow::new(vec![
            DataValue::String(book),
            DataValue::String(format!("DESK_{}", i % 25)),
            DataValue::Integer(i as i64),
            DataValue::String(format!("STATUS_{}", i % 5)),
        ]);
        table.add_row(row).unwrap();
    }

    table
}

fn benchmark_flatten(c: &mut Criterion) {
    let table_10k = Arc::new(create_test_data(10_000));
    let table_100k = Arc::new(create_test_data(100_000));

    let mut group = c.benchmark_group("grouping_flatten");

    group.bench_function("10k_rows_two_levels", |b| {
        b.iter(|| {
            let mut view = GroupingView::new(Arc::clone(&table_10k), &["book", "desk"]);
            view.expand_all();
            black_box(view.row_count())
        });
    });

    group.bench_function("100k_rows_two_levels", |b| {
        b.iter(|| {
            let mut view = GroupingView::new(Arc::clone(&table_100k), &["book", "desk"]);
            view.expand_all();
            black_box(view.row_count())
        });
    });

    group.finish();
}

fn benchmark_navigation(c: &mut Criterion) {
    let table = Arc::new(create_test_data(100_000));

    let mut group = c.benchmark_group("navigation");

    group.bench_function("page_down_sweep", |b| {
        let mut grid = GridManager::new(Arc::clone(&table), &[], GridConfig::default());
        grid.resize(120, 50);
        grid.handle_action(GridAction::TabForward);
        b.iter(|| {
            grid.handle_action(GridAction::FirstCell);
            for _ in 0..50 {
                black_box(grid.handle_action(GridAction::PageDown));
            }
        });
    });

    group.bench_function("corner_to_corner", |b| {
        let mut grid = GridManager::new(Arc::clone(&table), &[], GridConfig::default());
        grid.resize(120, 50);
        grid.handle_action(GridAction::TabForward);
        b.iter(|| {
            black_box(grid.handle_action(GridAction::LastCell));
            black_box(grid.handle_action(GridAction::FirstCell));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_flatten, benchmark_navigation);
criterion_main!(benches);
