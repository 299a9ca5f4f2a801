//! Grid Manager - Centralized grid state and event entry points
//!
//! This manager owns the grouping view, viewport, selection machine and
//! row-selection set, and ensures all updates go through a single
//! interface so derived state (flattened sequence, viewport window,
//! selection clamp) stays in sync after every event.

use std::collections::HashSet;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use tracing::debug;

use crate::config::config::GridConfig;
use crate::data::column::ColumnLayout;
use crate::data::datatable::DataTable;
use crate::data::grouping::GroupingView;
use crate::data::row::GridRow;
use crate::ui::actions::{GridAction, NavigationKeymap};
use crate::ui::navigation::{
    FocusTarget, NavigationResult, Position, SelectionNavigator,
};
use crate::ui::render_dispatch::{render_viewport, GridRenderer};
use crate::ui::viewport_manager::{ViewportManager, ViewportRange};

/// Row-level selection toggle, independent of cell focus
#[derive(Debug, Clone, Copy)]
pub struct SelectRowEvent {
    /// Flat row index the event targets
    pub row_idx: usize,
    pub checked: bool,
    /// Shift-click extends the selection from the previously toggled row
    pub is_shift_click: bool,
}

/// The grid instance: one per rendered grid, no cross-instance sharing.
/// All mutation happens on the event-processing thread.
pub struct GridManager {
    grouping: GroupingView,
    layout: Arc<ColumnLayout>,
    viewport: ViewportManager,
    navigator: SelectionNavigator,
    keymap: NavigationKeymap,
    config: GridConfig,
    /// Checkbox-selected rows, keyed by base-table index so the set
    /// survives grouping changes
    selected_rows: HashSet<usize>,
    /// Anchor for shift-click range selection (flat index)
    last_toggled_row: Option<usize>,
}

impl GridManager {
    pub fn new(table: Arc<DataTable>, group_by: &[&str], config: GridConfig) -> Self {
        let columns = table.columns().to_vec();
        let layout = if config.display.show_select_column {
            Arc::new(ColumnLayout::with_select_column(columns))
        } else {
            Arc::new(ColumnLayout::new(columns))
        };
        let grouping = GroupingView::new(table, group_by);
        let viewport = ViewportManager::new(
            Arc::clone(&layout),
            config.display.overscan_rows,
            config.display.overscan_cols,
        );
        let mut manager = Self {
            grouping,
            layout,
            viewport,
            navigator: SelectionNavigator::new(),
            keymap: NavigationKeymap::new(),
            config,
            selected_rows: HashSet::new(),
            last_toggled_row: None,
        };
        manager.sync_row_heights();
        manager
    }

    /// Flattened row count under the current grouping
    pub fn row_count(&self) -> usize {
        self.grouping.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.layout.column_count()
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn grouping(&self) -> &GroupingView {
        &self.grouping
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn visible_range(&self) -> &ViewportRange {
        self.viewport.visible_range()
    }

    pub fn position(&self) -> Option<Position> {
        self.navigator.position()
    }

    pub fn focus_target(&self) -> FocusTarget {
        self.navigator.focus_target(&self.layout)
    }

    pub fn is_row_selected(&self) -> bool {
        self.navigator.is_row_selected(&self.layout)
    }

    pub fn selected_rows(&self) -> &HashSet<usize> {
        &self.selected_rows
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Key event entry point. Unbound keys are ignored.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<NavigationResult> {
        let action = self.keymap.resolve(event)?;
        Some(self.handle_action(action))
    }

    /// Apply one navigation action; the auto-scroll is applied before
    /// returning, so consecutive actions never see a stale window.
    pub fn handle_action(&mut self, action: GridAction) -> NavigationResult {
        self.navigator.handle_action(
            action,
            self.grouping.row_count(),
            &self.layout,
            &mut self.viewport,
        )
    }

    /// Request to move the selection, typically from a render-layer click.
    /// Out-of-range positions clamp; `enable_editor` puts the target cell
    /// in edit mode.
    pub fn select_cell(&mut self, position: Position, enable_editor: bool) -> NavigationResult {
        self.navigator.select_cell(
            position,
            enable_editor,
            self.grouping.row_count(),
            &self.layout,
            &mut self.viewport,
        )
    }

    /// Click on a group row outside any specific cell: whole-row selection
    pub fn select_group_row(&mut self, row_idx: usize) -> NavigationResult {
        self.select_cell(Position::group_row(row_idx), false)
    }

    /// Row-level checkbox toggle. A shift-click applies the new state to
    /// the whole range from the previous toggle; checking a group row
    /// applies to all of its children.
    pub fn select_row(&mut self, event: SelectRowEvent) {
        let row_idx = event.row_idx.min(self.grouping.row_count().saturating_sub(1));
        if event.is_shift_click {
            if let Some(anchor) = self.last_toggled_row {
                let (from, to) = if anchor <= row_idx {
                    (anchor, row_idx)
                } else {
                    (row_idx, anchor)
                };
                for idx in from..=to {
                    self.apply_row_check(idx, event.checked);
                }
                self.last_toggled_row = Some(row_idx);
                return;
            }
        }
        self.apply_row_check(row_idx, event.checked);
        self.last_toggled_row = Some(row_idx);
    }

    fn apply_row_check(&mut self, flat_idx: usize, checked: bool) {
        match self.grouping.row(flat_idx) {
            Some(GridRow::Leaf(base_row)) => {
                if checked {
                    self.selected_rows.insert(*base_row);
                } else {
                    self.selected_rows.remove(base_row);
                }
            }
            Some(GridRow::Group(group)) => {
                // A group checkbox acts on every leaf beneath it
                for &base_row in &group.child_rows {
                    if checked {
                        self.selected_rows.insert(base_row);
                    } else {
                        self.selected_rows.remove(&base_row);
                    }
                }
            }
            None => {}
        }
    }

    /// Expand or collapse a group. The flattened sequence changes shape, so
    /// the selection is re-clamped and row heights are rebuilt before the
    /// next read of the viewport.
    pub fn toggle_group(&mut self, group_id: &str) {
        self.grouping.toggle_group(group_id);
        self.sync_row_heights();
        self.navigator
            .revalidate(self.grouping.row_count(), self.layout.column_count());
        debug!(target: "grid_manager",
               "toggle_group {:?}: {} flat rows", group_id, self.grouping.row_count());
    }

    pub fn expand_all(&mut self) {
        self.grouping.expand_all();
        self.sync_row_heights();
        self.navigator
            .revalidate(self.grouping.row_count(), self.layout.column_count());
    }

    pub fn collapse_all(&mut self) {
        self.grouping.collapse_all();
        self.sync_row_heights();
        self.navigator
            .revalidate(self.grouping.row_count(), self.layout.column_count());
    }

    /// Scroll event from the container. Only the derived window updates;
    /// the selection stays where it is.
    pub fn on_scroll(&mut self, scroll_top: usize, scroll_left: usize) {
        self.viewport.set_scroll(scroll_top, scroll_left);
    }

    /// Scroll container resize
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.set_viewport_size(width, height);
    }

    /// Dispatch the visible window to the render layer
    pub fn render<R: GridRenderer>(&self, renderer: &mut R) {
        render_viewport(
            &self.grouping,
            &self.layout,
            &self.viewport,
            &self.navigator,
            &self.selected_rows,
            renderer,
        );
    }

    /// Rebuild per-row heights after the flattened sequence changed
    fn sync_row_heights(&mut self) {
        let display = &self.config.display;
        let heights: Vec<u16> = self
            .grouping
            .rows()
            .iter()
            .map(|row| match row {
                GridRow::Leaf(_) => display.row_height,
                GridRow::Group(group) => display.group_row_height(group.level),
            })
            .collect();
        self.viewport.set_row_heights(heights);
    }
}
