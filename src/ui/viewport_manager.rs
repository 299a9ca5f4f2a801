/// ViewportManager - A window into the flattened row sequence
///
/// This manages the visible portion of the grid for rendering, handling:
/// - Row windowing by cumulative height (group rows may be taller than
///   leaf rows, so offsets are prefix sums, not multiples)
/// - Column windowing by cumulative width, with the frozen prefix always
///   materialized regardless of horizontal scroll
/// - Overscan margins on both ends to avoid pop-in during fast scroll
/// - Scroll requests that bring a target cell fully into view
///
/// Architecture:
/// DataTable (immutable storage)
///     → GroupingView (flattened row sequence)
///         → ViewportManager (visible window)
///             → render dispatch (consumer callbacks)
///
/// The viewport is derived state: it is recomputed from the scroll offsets
/// and never feeds back into navigation. A scroll event only updates the
/// window; it cannot move the selection.
use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::data::column::ColumnLayout;

/// The set of row/column indices currently materialized.
///
/// `scrolled_cols` always starts at or after the frozen prefix, so the two
/// column ranges never overlap and no cell is dispatched twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportRange {
    /// Overscan-padded flat row indices
    pub rows: Range<usize>,
    /// The frozen column prefix, always visible
    pub frozen_cols: Range<usize>,
    /// Overscan-padded scrollable column window
    pub scrolled_cols: Range<usize>,
}

impl ViewportRange {
    pub fn empty() -> Self {
        Self {
            rows: 0..0,
            frozen_cols: 0..0,
            scrolled_cols: 0..0,
        }
    }

    pub fn contains_row(&self, row_idx: usize) -> bool {
        self.rows.contains(&row_idx)
    }

    pub fn contains_col(&self, col_idx: usize) -> bool {
        self.frozen_cols.contains(&col_idx) || self.scrolled_cols.contains(&col_idx)
    }

    /// All visible column indices: frozen prefix, then the scrolled window
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.frozen_cols.clone().chain(self.scrolled_cols.clone())
    }
}

/// Result of a scroll request issued by navigation
#[derive(Debug, Clone)]
pub struct ScrollResult {
    pub scroll_top: usize,
    pub scroll_left: usize,
    /// Whether the request actually moved the window
    pub scrolled: bool,
}

pub struct ViewportManager {
    /// Column coordinate space (widths, frozen prefix, x offsets)
    layout: Arc<ColumnLayout>,

    /// Cumulative top per flat row, plus the total height as last entry.
    /// Rebuilt whenever the flattened sequence changes.
    row_offsets: Vec<usize>,

    /// Scroll offsets in display units
    scroll_top: usize,
    scroll_left: usize,

    /// Scroll container dimensions
    viewport_width: u16,
    viewport_height: u16,

    /// Overscan margins (rows/columns beyond the strictly visible window)
    overscan_rows: usize,
    overscan_cols: usize,

    /// Cached derived window, recomputed on every scroll/resize/reflow
    range: ViewportRange,
}

impl ViewportManager {
    pub fn new(layout: Arc<ColumnLayout>, overscan_rows: usize, overscan_cols: usize) -> Self {
        let mut vm = Self {
            layout,
            row_offsets: vec![0],
            scroll_top: 0,
            scroll_left: 0,
            viewport_width: 0,
            viewport_height: 0,
            overscan_rows,
            overscan_cols,
            range: ViewportRange::empty(),
        };
        vm.recompute();
        vm
    }

    /// Replace the row heights after the flattened sequence changed.
    /// Heights are per flat row, in display units.
    pub fn set_row_heights(&mut self, heights: impl IntoIterator<Item = u16>) {
        let mut offsets = Vec::with_capacity(self.row_offsets.len());
        let mut y = 0usize;
        offsets.push(0);
        for h in heights {
            y += h as usize;
            offsets.push(y);
        }
        self.row_offsets = offsets;
        self.clamp_scroll();
        self.recompute();
    }

    pub fn set_layout(&mut self, layout: Arc<ColumnLayout>) {
        self.layout = layout;
        self.clamp_scroll();
        self.recompute();
    }

    /// Update the scroll container dimensions
    pub fn set_viewport_size(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.clamp_scroll();
        self.recompute();
        debug!(target: "viewport_manager",
               "set_viewport_size: {}x{} -> rows={:?} cols={:?}+{:?}",
               width, height, self.range.rows, self.range.frozen_cols, self.range.scrolled_cols);
    }

    /// Apply a scroll event. Only the derived window is updated; the
    /// selection is never touched from here.
    pub fn set_scroll(&mut self, scroll_top: usize, scroll_left: usize) {
        self.scroll_top = scroll_top;
        self.scroll_left = scroll_left;
        self.clamp_scroll();
        self.recompute();
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_left(&self) -> usize {
        self.scroll_left
    }

    pub fn visible_range(&self) -> &ViewportRange {
        &self.range
    }

    pub fn total_rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn total_height(&self) -> usize {
        *self.row_offsets.last().unwrap_or(&0)
    }

    pub fn row_top(&self, row_idx: usize) -> usize {
        self.row_offsets.get(row_idx).copied().unwrap_or(0)
    }

    pub fn row_height(&self, row_idx: usize) -> u16 {
        let top = self.row_top(row_idx);
        let bottom = self.row_offsets.get(row_idx + 1).copied().unwrap_or(top);
        (bottom - top) as u16
    }

    /// Whether both edges of the row lie inside the scroll window
    pub fn is_row_fully_visible(&self, row_idx: usize) -> bool {
        if row_idx >= self.total_rows() {
            return false;
        }
        let top = self.row_offsets[row_idx];
        let bottom = self.row_offsets[row_idx + 1];
        top >= self.scroll_top && bottom <= self.scroll_top + self.viewport_height as usize
    }

    /// Number of rows fully visible at the current scroll position.
    /// This is what PageUp/PageDown advance by; never less than 1.
    pub fn page_size(&self) -> usize {
        let total = self.total_rows();
        if total == 0 {
            return 1;
        }
        let window_end = self.scroll_top + self.viewport_height as usize;
        // First row whose top is at or below scroll_top
        let first = self.row_offsets[..total].partition_point(|&top| top < self.scroll_top);
        // One past the last row whose bottom fits in the window
        let last = self.row_offsets[1..].partition_point(|&bottom| bottom <= window_end);
        last.saturating_sub(first).max(1)
    }

    /// Scroll the minimum amount so the row is fully visible vertically.
    /// Returns whether the window moved.
    pub fn scroll_to_row(&mut self, row_idx: usize) -> bool {
        let total = self.total_rows();
        if total == 0 {
            return false;
        }
        let row_idx = row_idx.min(total - 1);
        let top = self.row_offsets[row_idx];
        let bottom = self.row_offsets[row_idx + 1];
        let height = self.viewport_height as usize;

        let new_top = if top < self.scroll_top {
            top
        } else if bottom > self.scroll_top + height {
            bottom.saturating_sub(height)
        } else {
            self.scroll_top
        };

        if new_top != self.scroll_top {
            self.scroll_top = new_top;
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Scroll the minimum amount so the column is fully visible without
    /// being obscured by the frozen prefix. Frozen columns are always
    /// visible, so requests for them never move the window.
    pub fn scroll_to_col(&mut self, col_idx: usize) -> bool {
        let count = self.layout.column_count();
        if count == 0 || col_idx >= count || self.layout.is_frozen(col_idx) {
            return false;
        }
        let frozen_width = self.layout.frozen_width();
        let width = self.viewport_width as usize;
        if width <= frozen_width {
            // No scrollable region to reveal the column in
            return false;
        }
        let left = self.layout.x_offset(col_idx);
        let right = left + self.layout.width(col_idx) as usize;

        // Visible content window for scrollable columns:
        // [scroll_left + frozen_width, scroll_left + viewport_width)
        let new_left = if left < self.scroll_left + frozen_width {
            left.saturating_sub(frozen_width)
        } else if right > self.scroll_left + width {
            right.saturating_sub(width)
        } else {
            self.scroll_left
        };

        if new_left != self.scroll_left {
            self.scroll_left = new_left;
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Bring a cell fully into view. `col_idx` of None scrolls vertically
    /// only (whole-row selection has no horizontal target).
    pub fn scroll_to_cell(&mut self, row_idx: usize, col_idx: Option<usize>) -> ScrollResult {
        let mut scrolled = self.scroll_to_row(row_idx);
        if let Some(col) = col_idx {
            scrolled |= self.scroll_to_col(col);
        }
        if scrolled {
            debug!(target: "viewport_manager",
                   "scroll_to_cell: row={} col={:?} -> top={} left={}",
                   row_idx, col_idx, self.scroll_top, self.scroll_left);
        }
        ScrollResult {
            scroll_top: self.scroll_top,
            scroll_left: self.scroll_left,
            scrolled,
        }
    }

    fn clamp_scroll(&mut self) {
        let max_top = self
            .total_height()
            .saturating_sub(self.viewport_height as usize);
        let max_left = self
            .layout
            .total_width()
            .saturating_sub(self.viewport_width as usize);
        self.scroll_top = self.scroll_top.min(max_top);
        self.scroll_left = self.scroll_left.min(max_left);
    }

    /// Recompute the derived window from the current scroll offsets
    fn recompute(&mut self) {
        self.range = ViewportRange {
            rows: self.compute_visible_rows(),
            frozen_cols: 0..self.layout.frozen_count(),
            scrolled_cols: self.compute_scrolled_cols(),
        };
    }

    fn compute_visible_rows(&self) -> Range<usize> {
        let total = self.total_rows();
        if total == 0 || self.viewport_height == 0 {
            return 0..0;
        }
        let window_end = self.scroll_top + self.viewport_height as usize;
        // First row whose bottom edge is below the window top
        let start = self.row_offsets[1..].partition_point(|&bottom| bottom <= self.scroll_top);
        // One past the last row whose top edge is above the window bottom
        let end = self.row_offsets[..total].partition_point(|&top| top < window_end);
        let start = start.saturating_sub(self.overscan_rows);
        let end = (end + self.overscan_rows).min(total);
        start..end
    }

    fn compute_scrolled_cols(&self) -> Range<usize> {
        let frozen = self.layout.frozen_count();
        let count = self.layout.column_count();
        if count == frozen || self.viewport_width == 0 {
            return frozen..frozen;
        }
        let frozen_width = self.layout.frozen_width();
        let width = self.viewport_width as usize;
        if width <= frozen_width {
            // Frozen prefix fills the container; nothing else fits
            return frozen..frozen;
        }
        let window_start = self.scroll_left + frozen_width;
        let window_end = self.scroll_left + width;

        let mut start = frozen;
        while start < count {
            let right = self.layout.x_offset(start) + self.layout.width(start) as usize;
            if right > window_start {
                break;
            }
            start += 1;
        }
        let mut end = start;
        while end < count && self.layout.x_offset(end) < window_end {
            end += 1;
        }

        let start = start.saturating_sub(self.overscan_cols).max(frozen);
        let end = (end + self.overscan_cols).min(count);
        start..end
    }
}
