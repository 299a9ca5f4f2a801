// Render dispatch: the visible window maps to exactly one context per
// cell, group rows carry their label placement and aria state, and the
// whole-row sentinel takes priority over any nested focus.

use std::sync::Arc;

use data_grid::config::config::GridConfig;
use data_grid::data::column::GridColumn;
use data_grid::data::datatable::{DataRow, DataTable, DataValue};
use data_grid::ui::grid_manager::{GridManager, SelectRowEvent};
use data_grid::ui::navigation::{FocusTarget, Position};
use data_grid::ui::render_dispatch::{CellContext, GridRenderer, GroupCellContext};

fn create_table() -> Arc<DataTable> {
    let mut table = DataTable::new("test");
    table.add_column(GridColumn::new("category").with_width(10));
    table.add_column(GridColumn::new("name").with_width(10));
    table.add_column(GridColumn::new("amount").with_width(8));

    let rows = [
        ("A", "one", 1),
        ("A", "two", 2),
        ("B", "three", 3),
        ("B", "four", 4),
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
    Arc::new(table)
}

struct Recorded {
    row_idx: usize,
    idx: usize,
    is_group: bool,
    is_cell_selected: bool,
    is_row_focused: bool,
    is_row_selected: bool,
    is_even_row: bool,
    group_column_index: Option<usize>,
    is_expanded: bool,
    level: usize,
    child_count: usize,
    value: Option<String>,
}

#[derive(Default)]
struct RecordingRenderer {
    cells: Vec<Recorded>,
}

impl GridRenderer for RecordingRenderer {
    fn render_cell(&mut self, ctx: &CellContext<'_>) {
        self.cells.push(Recorded {
            row_idx: ctx.row_idx,
            idx: ctx.idx,
            is_group: false,
            is_cell_selected: ctx.is_cell_selected,
            is_row_focused: false,
            is_row_selected: ctx.is_row_selected,
            is_even_row: ctx.is_even_row,
            group_column_index: None,
            is_expanded: false,
            level: 0,
            child_count: 0,
            value: ctx.value.map(|v| v.to_string()),
        });
    }

    fn render_group_cell(&mut self, ctx: &GroupCellContext<'_>) {
        self.cells.push(Recorded {
            row_idx: ctx.row_idx,
            idx: ctx.idx,
            is_group: true,
            is_cell_selected: ctx.is_cell_selected,
            is_row_focused: ctx.is_row_focused,
            is_row_selected: ctx.is_row_selected,
            is_even_row: ctx.is_even_row,
            group_column_index: Some(ctx.group_column_index),
            is_expanded: ctx.is_expanded,
            level: ctx.level,
            child_count: ctx.child_rows.len(),
            value: None,
        });
    }
}

fn grouped_grid(show_select_column: bool) -> GridManager {
    let mut config = GridConfig::default();
    config.display.show_select_column = show_select_column;
    let mut grid = GridManager::new(create_table(), &["category"], config);
    grid.resize(80, 20);
    grid
}

#[test]
fn every_visible_cell_is_dispatched_exactly_once() {
    let mut grid = grouped_grid(true);
    grid.expand_all();

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);

    // 6 flat rows (2 groups + 4 leaves), 4 columns, all visible
    assert_eq!(renderer.cells.len(), 6 * 4);

    let mut seen = std::collections::HashSet::new();
    for cell in &renderer.cells {
        assert!(
            seen.insert((cell.row_idx, cell.idx)),
            "cell ({}, {}) dispatched twice",
            cell.row_idx,
            cell.idx
        );
    }
}

#[test]
fn group_label_shifts_right_of_the_select_column() {
    let mut grid = grouped_grid(true);
    grid.expand_all();

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);

    let group_cell = renderer
        .cells
        .iter()
        .find(|c| c.is_group && c.row_idx == 0)
        .expect("group row dispatched");
    // level 0 with a select column at position 0
    assert_eq!(group_cell.group_column_index, Some(1));
    assert_eq!(group_cell.level, 0);
    assert!(group_cell.is_expanded);
    assert_eq!(group_cell.child_count, 2);

    // without the select column the label sits at the level itself
    let mut grid = grouped_grid(false);
    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);
    let group_cell = renderer
        .cells
        .iter()
        .find(|c| c.is_group)
        .expect("group row dispatched");
    assert_eq!(group_cell.group_column_index, Some(0));
    assert!(!group_cell.is_expanded);
}

#[test]
fn sentinel_selection_focuses_the_row_container() {
    let mut grid = grouped_grid(true);

    grid.select_group_row(0);
    assert_eq!(grid.position(), Some(Position::group_row(0)));
    // sentinel priority: the container wins even though the select
    // column's checkbox is a focusable cell on this row
    assert_eq!(grid.focus_target(), FocusTarget::Container);
    assert!(grid.is_row_selected());

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);
    for cell in renderer.cells.iter().filter(|c| c.row_idx == 0) {
        assert!(cell.is_row_focused);
        assert!(!cell.is_cell_selected);
    }
    for cell in renderer.cells.iter().filter(|c| c.row_idx != 0) {
        assert!(!cell.is_row_focused);
    }
}

#[test]
fn checkbox_state_flows_into_render_contexts() {
    let mut grid = grouped_grid(true);
    grid.expand_all();

    // select both leaves of group A (base rows 0 and 1)
    grid.select_row(SelectRowEvent {
        row_idx: 1,
        checked: true,
        is_shift_click: false,
    });
    grid.select_row(SelectRowEvent {
        row_idx: 2,
        checked: true,
        is_shift_click: false,
    });

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);

    // the A group reports fully selected, B does not
    let group_a = renderer
        .cells
        .iter()
        .find(|c| c.is_group && c.row_idx == 0)
        .unwrap();
    assert!(group_a.is_row_selected);
    let group_b = renderer
        .cells
        .iter()
        .find(|c| c.is_group && c.row_idx == 3)
        .unwrap();
    assert!(!group_b.is_row_selected);

    // leaf contexts carry their own checkbox state
    let leaf = renderer
        .cells
        .iter()
        .find(|c| !c.is_group && c.row_idx == 1)
        .unwrap();
    assert!(leaf.is_row_selected);
    let unselected_leaf = renderer
        .cells
        .iter()
        .find(|c| !c.is_group && c.row_idx == 4)
        .unwrap();
    assert!(!unselected_leaf.is_row_selected);
}

#[test]
fn leaf_values_map_through_the_select_column_offset() {
    let mut grid = grouped_grid(true);
    grid.expand_all();

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);

    // first leaf of group A sits at flat index 1 (base row 0)
    let select_cell = renderer
        .cells
        .iter()
        .find(|c| c.row_idx == 1 && c.idx == 0)
        .unwrap();
    assert_eq!(select_cell.value, None); // select column has no data

    let category_cell = renderer
        .cells
        .iter()
        .find(|c| c.row_idx == 1 && c.idx == 1)
        .unwrap();
    assert_eq!(category_cell.value.as_deref(), Some("A"));

    let amount_cell = renderer
        .cells
        .iter()
        .find(|c| c.row_idx == 1 && c.idx == 3)
        .unwrap();
    assert_eq!(amount_cell.value.as_deref(), Some("1"));
}

#[test]
fn row_parity_alternates_by_flat_index() {
    let mut grid = grouped_grid(true);
    grid.expand_all();

    let mut renderer = RecordingRenderer::default();
    grid.render(&mut renderer);

    for cell in &renderer.cells {
        assert_eq!(cell.is_even_row, cell.row_idx % 2 == 0);
    }
}

#[test]
fn dispatch_is_referentially_transparent() {
    let mut grid = grouped_grid(true);
    grid.expand_all();
    grid.select_cell(Position::cell(2, 1), false);

    let mut first = RecordingRenderer::default();
    grid.render(&mut first);
    let mut second = RecordingRenderer::default();
    grid.render(&mut second);

    assert_eq!(first.cells.len(), second.cells.len());
    for (a, b) in first.cells.iter().zip(second.cells.iter()) {
        assert_eq!((a.row_idx, a.idx), (b.row_idx, b.idx));
        assert_eq!(a.is_cell_selected, b.is_cell_selected);
    }
}
