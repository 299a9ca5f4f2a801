// Grid Debug Binary - For testing navigation in isolation
// Run with: cargo run --bin grid_debug

use std::sync::Arc;

use data_grid::config::config::GridConfig;
use data_grid::data::column::GridColumn;
use data_grid::data::datatable::{DataRow, DataTable, DataValue};
use data_grid::data::row::GridRow;
use data_grid::ui::actions::GridAction;
use data_grid::ui::grid_manager::GridManager;

fn main() {
    println!("=== Grid Navigation Debug ===");
    println!("Set breakpoints in src/ui/navigation.rs\n");

    let mut table = DataTable::new("debug");
    table.add_column(GridColumn::new("category").with_width(12));
    table.add_column(GridColumn::new("name").with_width(12));
    table.add_column(GridColumn::new("amount").with_width(8));

    let rows = vec![
        ("Sales", "Alice", 100),
        ("Sales", "Charlie", 150),
        ("Marketing", "Bob", 200),
        ("Marketing", "Eve", 175),
        ("Engineering", "David", 300),
        ("Engineering", "Grace", 180),
    ];
    for (category, name, amount) in rows {
        table
            .add_row(DataRow::new(vec![
                DataValue::String(category.to_string()),
                DataValue::String(name.to_string()),
                DataValue::Integer(amount),
            ]))
            .unwrap();
    }

    let mut grid = GridManager::new(Arc::new(table), &["category"], GridConfig::default());
    grid.resize(60, 4);

    println!("Initial state:");
    println!("  Flat rows: {}", grid.row_count());
    println!("  Columns:   {}", grid.column_count());
    dump_rows(&grid);

    println!("\nExpanding all groups:");
    grid.expand_all();
    println!("  Flat rows: {}", grid.row_count());
    dump_rows(&grid);

    let script = [
        GridAction::TabForward, // enter at (0, 0)
        GridAction::MoveRight,
        GridAction::MoveDown,
        GridAction::MoveDown,
        GridAction::LastCell,
        GridAction::PageUp,
        GridAction::FirstCell,
        GridAction::TabBackward, // exits the grid
    ];

    println!("\nScripted navigation:");
    for action in script {
        let result = grid.handle_action(action);
        println!(
            "  {:<12} -> {:<24} viewport rows {:?}",
            format!("{:?}", action),
            result.description,
            grid.visible_range().rows,
        );
    }

    println!("\nCollapsing first group with the selection inside it:");
    grid.handle_action(GridAction::TabForward);
    grid.handle_action(GridAction::MoveDown);
    let first_group = grid
        .grouping()
        .rows()
        .iter()
        .find_map(|row| row.as_group().map(|g| g.id.clone()))
        .expect("grouped view has a group row");
    grid.toggle_group(&first_group);
    println!("  Flat rows: {}", grid.row_count());
    println!("  Selection after collapse: {:?}", grid.position());
}

fn dump_rows(grid: &GridManager) {
    for (flat_idx, row) in grid.grouping().rows().iter().enumerate() {
        match row {
            GridRow::Group(group) => println!(
                "  [{}] group {:?} level={} children={} expanded={}",
                flat_idx,
                group.id,
                group.level,
                group.child_rows.len(),
                group.is_expanded
            ),
            GridRow::Leaf(base) => println!("  [{}] leaf #{}", flat_idx, base),
        }
    }
}
