// Grouping: flatten order, expand/collapse accounting, child row
// integrity, and selection clamping when the sequence shrinks.

use std::sync::Arc;

use data_grid::config::config::GridConfig;
use data_grid::data::column::GridColumn;
use data_grid::data::datatable::{DataRow, DataTable, DataValue};
use data_grid::data::grouping::GroupingView;
use data_grid::data::row::GridRow;
use data_grid::ui::grid_manager::{GridManager, SelectRowEvent};
use data_grid::ui::navigation::Position;

/// Orders across three countries, two years each, one row per (country,
/// year, product). Insertion order is deliberately not sorted.
fn create_orders_table() -> Arc<DataTable> {
    let mut table = DataTable::new("orders");
    table.add_column(GridColumn::new("country").with_width(10));
    table.add_column(GridColumn::new("year").with_width(6));
    table.add_column(GridColumn::new("product").with_width(12));

    let rows = [
        ("USA", "2021", "widgets"),
        ("USA", "2020", "gears"),
        ("Canada", "2021", "widgets"),
        ("USA", "2021", "gears"),
        ("Canada", "2020", "sprockets"),
        ("France", "2020", "widgets"),
        ("Canada", "2021", "gears"),
        ("France", "2021", "sprockets"),
    ];
    for (country, year, product) in rows {
        table
            .add_row(DataRow::new(vec![
                DataValue::String(country.to_string()),
                DataValue::String(year.to_string()),
                DataValue::String(product.to_string()),
            ]))
            .unwrap();
    }
    Arc::new(table)
}

fn group_ids(view: &GroupingView) -> Vec<String> {
    view.rows()
        .iter()
        .filter_map(|row| row.as_group().map(|g| g.id.clone()))
        .collect()
}

#[test]
fn collapsed_view_shows_only_top_level_groups() {
    let view = GroupingView::new(create_orders_table(), &["country", "year"]);

    // three countries, in first-appearance order
    assert_eq!(view.row_count(), 3);
    assert_eq!(group_ids(&view), vec!["USA", "Canada", "France"]);
}

#[test]
fn expanding_reveals_nested_groups_then_leaves() {
    let mut view = GroupingView::new(create_orders_table(), &["country", "year"]);

    view.toggle_group("USA");
    // USA + its two year groups + the other two countries
    assert_eq!(view.row_count(), 5);
    assert_eq!(group_ids(&view), vec!["USA", "USA/2021", "USA/2020", "Canada", "France"]);

    view.toggle_group("USA/2021");
    // two USA/2021 leaves appear, interleaved right after their group
    assert_eq!(view.row_count(), 7);
    let rows = view.rows();
    assert!(rows[1].is_group()); // USA/2021
    assert_eq!(rows[2].leaf_index(), Some(0));
    assert_eq!(rows[3].leaf_index(), Some(3));
    assert!(rows[4].is_group()); // USA/2020
}

#[test]
fn collapse_restores_count_and_order() {
    let mut view = GroupingView::new(create_orders_table(), &["country", "year"]);
    let initial_ids = group_ids(&view);

    view.toggle_group("Canada");
    view.toggle_group("Canada/2021");
    let expanded_count = view.row_count();
    assert_eq!(expanded_count, 3 + 2 + 2); // countries + year groups + leaves

    // collapsing the parent removes all its visible descendants at once
    view.toggle_group("Canada");
    assert_eq!(view.row_count(), 3);
    assert_eq!(group_ids(&view), initial_ids);

    // re-expanding restores the exact shape: the child expansion survived
    view.toggle_group("Canada");
    assert_eq!(view.row_count(), expanded_count);
}

#[test]
fn child_rows_are_the_leaves_beneath_the_group() {
    let mut view = GroupingView::new(create_orders_table(), &["country", "year"]);
    view.expand_all();

    let canada = view
        .rows()
        .iter()
        .find_map(|row| row.as_group().filter(|g| g.id == "Canada").cloned())
        .expect("Canada group exists");

    // all Canada leaves in base order, regardless of the year subgrouping
    assert_eq!(canada.child_rows, vec![2, 4, 6]);
    assert_eq!(canada.level, 0);

    let canada_2020 = view
        .rows()
        .iter()
        .find_map(|row| row.as_group().filter(|g| g.id == "Canada/2020").cloned())
        .expect("Canada/2020 group exists");
    assert_eq!(canada_2020.child_rows, vec![4]);
    assert_eq!(canada_2020.level, 1);
}

#[test]
fn ungrouped_view_is_the_identity_sequence() {
    let view = GroupingView::ungrouped(create_orders_table());
    assert_eq!(view.row_count(), 8);
    for (i, row) in view.rows().iter().enumerate() {
        assert_eq!(row.leaf_index(), Some(i));
    }
}

#[test]
fn collapsing_under_the_selection_clamps_it() {
    let mut config = GridConfig::default();
    config.display.show_select_column = false;
    let mut grid = GridManager::new(create_orders_table(), &["country", "year"], config);
    grid.resize(60, 20);
    grid.expand_all();
    let expanded_count = grid.row_count();

    // select the last flat row
    grid.select_cell(Position::cell(expanded_count - 1, 1), false);
    assert_eq!(grid.position(), Some(Position::cell(expanded_count - 1, 1)));

    grid.collapse_all();
    assert_eq!(grid.row_count(), 3);

    // the selection may not dangle past the new end
    let pos = grid.position().expect("selection survives the collapse");
    assert!(pos.row_idx < grid.row_count());
}

#[test]
fn group_checkbox_selects_every_child() {
    let mut config = GridConfig::default();
    config.display.show_select_column = true;
    let mut grid = GridManager::new(create_orders_table(), &["country"], config);
    grid.resize(60, 20);

    // check the Canada group row (flat index 1 in the collapsed view)
    grid.select_row(SelectRowEvent {
        row_idx: 1,
        checked: true,
        is_shift_click: false,
    });
    assert_eq!(grid.selected_rows().len(), 3);
    assert!(grid.selected_rows().contains(&2));
    assert!(grid.selected_rows().contains(&4));
    assert!(grid.selected_rows().contains(&6));

    // unchecking clears them again
    grid.select_row(SelectRowEvent {
        row_idx: 1,
        checked: false,
        is_shift_click: false,
    });
    assert!(grid.selected_rows().is_empty());
}

#[test]
fn shift_click_extends_the_selection_range() {
    let mut config = GridConfig::default();
    config.display.show_select_column = true;
    let mut grid = GridManager::new(create_orders_table(), &[], config);
    grid.resize(60, 20);

    grid.select_row(SelectRowEvent {
        row_idx: 2,
        checked: true,
        is_shift_click: false,
    });
    grid.select_row(SelectRowEvent {
        row_idx: 5,
        checked: true,
        is_shift_click: true,
    });

    // rows 2..=5 are now selected, keyed by base index
    assert_eq!(grid.selected_rows().len(), 4);
    for base in 2..=5 {
        assert!(grid.selected_rows().contains(&base));
    }

    // the anchor follows the last toggle: shift-unchecking walks back
    grid.select_row(SelectRowEvent {
        row_idx: 3,
        checked: false,
        is_shift_click: true,
    });
    assert_eq!(grid.selected_rows().len(), 1);
    assert!(grid.selected_rows().contains(&2));
}

#[test]
fn toggling_an_unknown_group_is_harmless() {
    let mut view = GroupingView::new(create_orders_table(), &["country"]);
    let before = view.row_count();
    view.toggle_group("Atlantis");
    assert_eq!(view.row_count(), before);

    // the id is now in the expanded set but matches nothing
    assert!(view.is_expanded("Atlantis"));
}

#[test]
fn leaf_rows_resolve_through_flat_indices() {
    let mut view = GroupingView::new(create_orders_table(), &["country"]);
    view.toggle_group("France");

    // France group sits at flat index 2, its leaves follow
    let Some(GridRow::Group(group)) = view.row(2) else {
        panic!("expected the France group at flat index 2");
    };
    assert_eq!(group.group_key, "France");
    assert!(group.is_expanded);
    assert_eq!(view.row(3).and_then(GridRow::leaf_index), Some(5));
    assert_eq!(view.row(4).and_then(GridRow::leaf_index), Some(7));
    assert!(view.row(5).is_none());
}
