/// Render dispatch - the boundary between the grid core and the paint layer.
///
/// Walks the currently visible (row, column) pairs and hands one context per
/// cell to a consumer-supplied renderer. Leaf rows and group rows dispatch
/// through different callbacks, decided by a match on the row variant.
///
/// Dispatch is a pure function of (rows, columns, selection, expansion,
/// viewport): the same inputs always produce the same sequence of callbacks,
/// so callers may diff or memoize freely.
///
/// The selected cell is materialized even when it lies outside the viewport
/// window (its row is dispatched as exactly one cell), so native focus never
/// falls on an unmounted element.
use std::collections::HashSet;

use crate::data::column::{ColumnLayout, GridColumn};
use crate::data::datatable::{DataTable, DataValue};
use crate::data::grouping::GroupingView;
use crate::data::row::{GridRow, GroupRow};
use crate::ui::navigation::{ColIdx, Position, SelectionNavigator};
use crate::ui::viewport_manager::ViewportManager;

/// Context for one leaf cell
pub struct CellContext<'a> {
    /// Flat row index
    pub row_idx: usize,
    /// Column index (the navigation coordinate)
    pub idx: usize,
    pub column: &'a GridColumn,
    /// Cell value; None for the select column
    pub value: Option<&'a DataValue>,
    /// Base-table index of the row
    pub base_row: usize,
    pub is_cell_selected: bool,
    /// Checkbox selection state of the row
    pub is_row_selected: bool,
    pub is_editing: bool,
    /// Even/odd parity of the flat row index, for striped styling
    pub is_even_row: bool,
    /// Top edge in content coordinates
    pub top: usize,
    pub height: u16,
}

/// Context for one cell of a group row
pub struct GroupCellContext<'a> {
    /// Stable group identifier
    pub id: &'a str,
    pub row_idx: usize,
    pub idx: usize,
    pub column: &'a GridColumn,
    pub group_key: &'a str,
    /// Nesting depth, 0 = top; render layers reflect this as aria-level
    pub level: usize,
    /// Leaf rows beneath this group, for aggregate display
    pub child_rows: &'a [usize],
    /// Expansion state; render layers reflect this as aria-expanded
    pub is_expanded: bool,
    /// Checkbox state: true when every child row is selected
    pub is_row_selected: bool,
    pub is_cell_selected: bool,
    /// Whole-row sentinel selection on this group row
    pub is_row_focused: bool,
    /// Column where the group label renders: level, shifted one right of
    /// the select column when present
    pub group_column_index: usize,
    pub is_even_row: bool,
    pub top: usize,
    pub height: u16,
}

/// Consumer-supplied paint callbacks
pub trait GridRenderer {
    fn render_cell(&mut self, ctx: &CellContext<'_>);
    fn render_group_cell(&mut self, ctx: &GroupCellContext<'_>);
}

/// Dispatch the visible window plus the (possibly off-window) selected cell
pub fn render_viewport<R: GridRenderer>(
    grouping: &GroupingView,
    layout: &ColumnLayout,
    viewport: &ViewportManager,
    navigator: &SelectionNavigator,
    selected_rows: &HashSet<usize>,
    renderer: &mut R,
) {
    let range = viewport.visible_range().clone();
    let table = grouping.table();
    let selection = navigator.position();
    let editing = navigator.is_editing();

    for row_idx in range.rows.clone() {
        let Some(row) = grouping.row(row_idx) else {
            continue;
        };
        let sel_col_here = selected_col_on_row(selection, row_idx);
        for idx in range.columns() {
            dispatch_cell(
                table, layout, viewport, row, row_idx, idx, sel_col_here, editing,
                selected_rows, renderer,
            );
        }
        // Keep the selected cell mounted when it scrolled out horizontally
        if let Some(ColIdx::Cell(sel_idx)) = sel_col_here {
            if !range.contains_col(sel_idx) {
                dispatch_cell(
                    table, layout, viewport, row, row_idx, sel_idx, sel_col_here, editing,
                    selected_rows, renderer,
                );
            }
        }
    }

    // Keep the selected cell mounted when its row scrolled out vertically:
    // that row contributes exactly one cell.
    if let Some(pos) = selection {
        if !range.contains_row(pos.row_idx) {
            if let Some(row) = grouping.row(pos.row_idx) {
                let idx = match pos.col {
                    ColIdx::Cell(i) => i,
                    // Sentinel selection pins the group label cell
                    ColIdx::Row => group_label_index(row, layout),
                };
                dispatch_cell(
                    table,
                    layout,
                    viewport,
                    row,
                    pos.row_idx,
                    idx,
                    Some(pos.col),
                    editing,
                    selected_rows,
                    renderer,
                );
            }
        }
    }
}

/// The selection's column when it sits on this flat row
fn selected_col_on_row(selection: Option<Position>, row_idx: usize) -> Option<ColIdx> {
    selection.and_then(|pos| (pos.row_idx == row_idx).then_some(pos.col))
}

fn group_label_index(row: &GridRow, layout: &ColumnLayout) -> usize {
    let level = row.as_group().map(|g| g.level).unwrap_or(0);
    let shift = if layout.has_select_column() { 1 } else { 0 };
    (level + shift).min(layout.column_count().saturating_sub(1))
}

#[allow(clippy::too_many_arguments)]
fn dispatch_cell<R: GridRenderer>(
    table: &DataTable,
    layout: &ColumnLayout,
    viewport: &ViewportManager,
    row: &GridRow,
    row_idx: usize,
    idx: usize,
    sel_col: Option<ColIdx>,
    editing: bool,
    selected_rows: &HashSet<usize>,
    renderer: &mut R,
) {
    let Some(column) = layout.column(idx) else {
        return;
    };
    let is_cell_selected = sel_col == Some(ColIdx::Cell(idx));
    let top = viewport.row_top(row_idx);
    let height = viewport.row_height(row_idx);
    let is_even_row = row_idx % 2 == 0;

    match row {
        GridRow::Leaf(base_row) => renderer.render_cell(&CellContext {
            row_idx,
            idx,
            column,
            value: layout
                .data_index(idx)
                .and_then(|data_col| table.get_value(*base_row, data_col)),
            base_row: *base_row,
            is_cell_selected,
            is_row_selected: selected_rows.contains(base_row),
            is_editing: editing && is_cell_selected,
            is_even_row,
            top,
            height,
        }),
        GridRow::Group(group) => renderer.render_group_cell(&GroupCellContext {
            id: &group.id,
            row_idx,
            idx,
            column,
            group_key: &group.group_key,
            level: group.level,
            child_rows: &group.child_rows,
            is_expanded: group.is_expanded,
            is_row_selected: group_fully_selected(group, selected_rows),
            is_cell_selected,
            is_row_focused: sel_col == Some(ColIdx::Row),
            group_column_index: group_label_index(row, layout),
            is_even_row,
            top,
            height,
        }),
    }
}

fn group_fully_selected(group: &GroupRow, selected_rows: &HashSet<usize>) -> bool {
    !group.child_rows.is_empty()
        && group
            .child_rows
            .iter()
            .all(|base_row| selected_rows.contains(base_row))
}
