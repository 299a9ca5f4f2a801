/// Selection and focus state machine.
///
/// Owns the authoritative selected position. Every key event becomes a
/// `GridAction` and is applied here synchronously: the machine computes the
/// next position, clamps it at the grid boundary, decides whether focus
/// leaves the grid entirely (tab out), and issues the auto-scroll request
/// before returning, so a following transition never reads a stale window.
use tracing::debug;

use crate::data::column::ColumnLayout;
use crate::ui::actions::GridAction;
use crate::ui::viewport_manager::ViewportManager;

/// Column coordinate of a selection.
///
/// `Row` marks whole-row selection with no specific cell, used by group
/// rows. In arithmetic it behaves as the index just left of column 0:
/// horizontal moves clamp it to the first column, vertical moves keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColIdx {
    Row,
    Cell(usize),
}

impl ColIdx {
    /// Signed coordinate: the `Row` sentinel sits at -1
    fn as_signed(self) -> isize {
        match self {
            ColIdx::Row => -1,
            ColIdx::Cell(i) => i as isize,
        }
    }

    pub fn cell_index(self) -> Option<usize> {
        match self {
            ColIdx::Row => None,
            ColIdx::Cell(i) => Some(i),
        }
    }

    pub fn is_row(self) -> bool {
        matches!(self, ColIdx::Row)
    }
}

/// A selected grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row_idx: usize,
    pub col: ColIdx,
}

impl Position {
    pub fn cell(row_idx: usize, col_idx: usize) -> Self {
        Self {
            row_idx,
            col: ColIdx::Cell(col_idx),
        }
    }

    /// Whole-row selection for a group row
    pub fn group_row(row_idx: usize) -> Self {
        Self {
            row_idx,
            col: ColIdx::Row,
        }
    }
}

/// Focus life cycle: the grid starts unfocused, becomes selected when
/// entered, and returns to unfocused only by tabbing past either end.
/// While unfocused the last position is remembered so tabbing back in
/// resumes where the user left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused { last: Option<Position> },
    Selected(Position),
}

/// Which element should hold native focus for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Nothing in the grid holds focus
    None,
    /// The row/cell container
    Container,
    /// The select-column checkbox input, itself a focusable cell
    CheckboxInput,
}

/// Result of one navigation transition
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// The position after the transition, None when focus left the grid
    pub position: Option<Position>,
    /// Whether focus left the grid entirely
    pub exited_grid: bool,
    /// Whether the transition changed the selected position
    pub changed: bool,
    /// Whether an auto-scroll was applied to bring the target into view
    pub scrolled: bool,
    /// Human-readable description of the transition
    pub description: String,
}

impl NavigationResult {
    fn unchanged(position: Option<Position>, description: impl Into<String>) -> Self {
        Self {
            position,
            exited_grid: false,
            changed: false,
            scrolled: false,
            description: description.into(),
        }
    }
}

pub struct SelectionNavigator {
    focus: FocusState,
    /// Edit mode is entered only by an explicit trigger and dropped on any
    /// navigation away from the cell
    editing: bool,
}

impl SelectionNavigator {
    pub fn new() -> Self {
        Self {
            focus: FocusState::Unfocused { last: None },
            editing: false,
        }
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    pub fn position(&self) -> Option<Position> {
        match self.focus {
            FocusState::Selected(pos) => Some(pos),
            FocusState::Unfocused { .. } => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whole-row selection state: true with the row sentinel active, or
    /// when the select-column checkbox is the focus target.
    pub fn is_row_selected(&self, layout: &ColumnLayout) -> bool {
        match self.focus {
            FocusState::Selected(pos) => {
                pos.col.is_row() || self.focus_target(layout) == FocusTarget::CheckboxInput
            }
            FocusState::Unfocused { .. } => false,
        }
    }

    /// Resolve which element holds native focus. Sentinel priority: with
    /// whole-row selection the container wins regardless of any nested
    /// focusable element.
    pub fn focus_target(&self, layout: &ColumnLayout) -> FocusTarget {
        match self.focus {
            FocusState::Unfocused { .. } => FocusTarget::None,
            FocusState::Selected(pos) => match pos.col {
                ColIdx::Row => FocusTarget::Container,
                ColIdx::Cell(0) if layout.has_select_column() => FocusTarget::CheckboxInput,
                ColIdx::Cell(_) => FocusTarget::Container,
            },
        }
    }

    /// Direct selection request (render-layer clicks, programmatic moves).
    /// Out-of-range coordinates clamp to the nearest valid position.
    pub fn select_cell(
        &mut self,
        position: Position,
        enable_editor: bool,
        total_rows: usize,
        layout: &ColumnLayout,
        viewport: &mut ViewportManager,
    ) -> NavigationResult {
        if total_rows == 0 || layout.column_count() == 0 {
            return NavigationResult::unchanged(self.position(), "empty grid");
        }
        let target = Self::clamp(position, total_rows, layout.column_count());
        let changed = self.position() != Some(target);
        self.focus = FocusState::Selected(target);
        self.editing = enable_editor;
        let scrolled = viewport.scroll_to_cell(target.row_idx, target.col.cell_index());
        debug!(target: "navigation",
               "select_cell: {:?} editor={} scrolled={}", target, enable_editor, scrolled.scrolled);
        NavigationResult {
            position: Some(target),
            exited_grid: false,
            changed,
            scrolled: scrolled.scrolled,
            description: format!("Selected {:?}", target),
        }
    }

    /// Apply one navigation action. The returned result carries the new
    /// position; the auto-scroll (if any) has already been applied.
    pub fn handle_action(
        &mut self,
        action: GridAction,
        total_rows: usize,
        layout: &ColumnLayout,
        viewport: &mut ViewportManager,
    ) -> NavigationResult {
        let col_count = layout.column_count();
        if total_rows == 0 || col_count == 0 {
            return NavigationResult::unchanged(self.position(), "empty grid");
        }

        let current = match self.focus {
            FocusState::Selected(pos) => Self::clamp(pos, total_rows, col_count),
            FocusState::Unfocused { last } => {
                return self.enter_grid(action, last, total_rows, layout, viewport);
            }
        };

        let last_col = col_count - 1;
        let last_row = total_rows - 1;
        let idx = current.col.as_signed();

        let next = match action {
            GridAction::MoveRight => Some(current.with_col_signed(idx + 1, last_col)),
            GridAction::MoveLeft => Some(current.with_col_signed(idx - 1, last_col)),
            GridAction::MoveDown => Some(Position {
                row_idx: (current.row_idx + 1).min(last_row),
                col: current.col,
            }),
            GridAction::MoveUp => Some(Position {
                row_idx: current.row_idx.saturating_sub(1),
                col: current.col,
            }),
            GridAction::FirstColumn => Some(Position::cell(current.row_idx, 0)),
            GridAction::LastColumn => Some(Position::cell(current.row_idx, last_col)),
            GridAction::FirstCell => Some(Position::cell(0, 0)),
            GridAction::LastCell => Some(Position::cell(last_row, last_col)),
            GridAction::PageDown => {
                let page = viewport.page_size();
                Some(Position {
                    row_idx: (current.row_idx + page).min(last_row),
                    col: current.col,
                })
            }
            GridAction::PageUp => {
                let page = viewport.page_size();
                Some(Position {
                    row_idx: current.row_idx.saturating_sub(page),
                    col: current.col,
                })
            }
            GridAction::TabForward => {
                if idx >= last_col as isize {
                    if current.row_idx == last_row {
                        None // past the last cell of the last row
                    } else {
                        Some(Position::cell(current.row_idx + 1, 0))
                    }
                } else {
                    Some(Position::cell(current.row_idx, (idx + 1) as usize))
                }
            }
            GridAction::TabBackward => {
                if idx <= 0 {
                    if current.row_idx == 0 {
                        None // before the first cell
                    } else {
                        Some(Position::cell(current.row_idx - 1, last_col))
                    }
                } else {
                    Some(Position::cell(current.row_idx, (idx - 1) as usize))
                }
            }
        };

        match next {
            None => {
                self.focus = FocusState::Unfocused {
                    last: Some(current),
                };
                self.editing = false;
                debug!(target: "navigation", "exit grid from {:?} via {:?}", current, action);
                NavigationResult {
                    position: None,
                    exited_grid: true,
                    changed: true,
                    scrolled: false,
                    description: "Focus left the grid".to_string(),
                }
            }
            Some(target) => {
                let changed = target != current;
                self.focus = FocusState::Selected(target);
                if changed {
                    self.editing = false;
                }
                // Apply the scroll request now so the next transition reads
                // a current window (page size, visibility checks).
                let scroll = viewport.scroll_to_cell(target.row_idx, target.col.cell_index());
                debug!(target: "navigation",
                       "{:?}: {:?} -> {:?} (scrolled={})", action, current, target, scroll.scrolled);
                NavigationResult {
                    position: Some(target),
                    exited_grid: false,
                    changed,
                    scrolled: scroll.scrolled,
                    description: format!("{:?} -> row {} col {:?}", action, target.row_idx, target.col),
                }
            }
        }
    }

    /// Re-clamp the selection after the flattened row count changed
    /// (group collapse/expand). Never leaves a dangling index.
    pub fn revalidate(&mut self, total_rows: usize, col_count: usize) {
        match self.focus {
            FocusState::Selected(pos) => {
                if total_rows == 0 || col_count == 0 {
                    self.focus = FocusState::Unfocused { last: None };
                    self.editing = false;
                } else {
                    let clamped = Self::clamp(pos, total_rows, col_count);
                    if clamped != pos {
                        debug!(target: "navigation",
                               "revalidate: {:?} -> {:?} (rows={} cols={})",
                               pos, clamped, total_rows, col_count);
                        self.focus = FocusState::Selected(clamped);
                        self.editing = false;
                    }
                }
            }
            FocusState::Unfocused { last: Some(pos) } => {
                if total_rows == 0 || col_count == 0 {
                    self.focus = FocusState::Unfocused { last: None };
                } else {
                    self.focus = FocusState::Unfocused {
                        last: Some(Self::clamp(pos, total_rows, col_count)),
                    };
                }
            }
            FocusState::Unfocused { last: None } => {}
        }
    }

    /// Tab from outside enters the grid, resuming the remembered position
    fn enter_grid(
        &mut self,
        action: GridAction,
        last: Option<Position>,
        total_rows: usize,
        layout: &ColumnLayout,
        viewport: &mut ViewportManager,
    ) -> NavigationResult {
        match action {
            GridAction::TabForward | GridAction::TabBackward => {
                let target = last
                    .map(|pos| Self::clamp(pos, total_rows, layout.column_count()))
                    .unwrap_or(Position::cell(0, 0));
                self.focus = FocusState::Selected(target);
                let scroll = viewport.scroll_to_cell(target.row_idx, target.col.cell_index());
                debug!(target: "navigation", "enter grid at {:?}", target);
                NavigationResult {
                    position: Some(target),
                    exited_grid: false,
                    changed: true,
                    scrolled: scroll.scrolled,
                    description: format!("Entered grid at {:?}", target),
                }
            }
            _ => NavigationResult::unchanged(None, "no selection"),
        }
    }

    fn clamp(pos: Position, total_rows: usize, col_count: usize) -> Position {
        Position {
            row_idx: pos.row_idx.min(total_rows - 1),
            col: match pos.col {
                ColIdx::Row => ColIdx::Row,
                ColIdx::Cell(i) => ColIdx::Cell(i.min(col_count - 1)),
            },
        }
    }
}

impl Default for SelectionNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Horizontal move in signed coordinates, clamped to [0, last_col].
    /// The row sentinel (-1) clamps to the first column either way.
    fn with_col_signed(self, idx: isize, last_col: usize) -> Position {
        let clamped = idx.clamp(0, last_col as isize) as usize;
        Position::cell(self.row_idx, clamped)
    }
}
