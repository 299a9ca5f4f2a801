use serde::{Deserialize, Serialize};

/// Reserved key for the checkbox selection column.
pub const SELECT_COLUMN_KEY: &str = "select";

/// Default width of the selection column in display units
const SELECT_COLUMN_WIDTH: u16 = 4;

/// A column definition as supplied by the consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridColumn {
    /// Unique identifier, also used to address the column from config/tests
    pub key: String,
    /// Header label
    pub name: String,
    /// Width in display units
    pub width: u16,
    /// Frozen columns stay at the leading edge regardless of horizontal scroll
    pub frozen: bool,
}

impl GridColumn {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            width: 10,
            frozen: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// The checkbox selection column. Always frozen so it cannot scroll
    /// out from under the rows it selects.
    pub fn select_column() -> Self {
        Self {
            key: SELECT_COLUMN_KEY.to_string(),
            name: String::new(),
            width: SELECT_COLUMN_WIDTH,
            frozen: true,
        }
    }

    pub fn is_select(&self) -> bool {
        self.key == SELECT_COLUMN_KEY
    }
}

/// Computed column coordinate space.
///
/// Columns are reordered so that frozen columns form a contiguous prefix
/// (relative order preserved on both sides of the split), then each column
/// gets a logical index and a cumulative x offset. The logical index is the
/// coordinate the navigation state machine operates on; the mapping back to
/// the position in the underlying data rows is kept alongside.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Vec<GridColumn>,
    /// Per layout index, the column's position in the data rows.
    /// None for the select column, which has no backing data.
    data_indices: Vec<Option<usize>>,
    /// Cumulative left edge per column, plus the total width as last entry
    x_offsets: Vec<usize>,
    frozen_count: usize,
    has_select_column: bool,
}

impl ColumnLayout {
    /// Build the layout from consumer columns, in data order. Frozen columns
    /// are moved to the front (stable), matching how the select column and
    /// pinned data columns are presented.
    pub fn new(columns: Vec<GridColumn>) -> Self {
        Self::build(columns, false)
    }

    /// Build the layout with the checkbox selection column prepended
    pub fn with_select_column(columns: Vec<GridColumn>) -> Self {
        Self::build(columns, true)
    }

    fn build(columns: Vec<GridColumn>, select: bool) -> Self {
        let mut tagged: Vec<(Option<usize>, GridColumn)> = Vec::with_capacity(columns.len() + 1);
        if select {
            tagged.push((None, GridColumn::select_column()));
        }
        for (data_idx, col) in columns.into_iter().enumerate() {
            tagged.push((Some(data_idx), col));
        }

        let mut frozen: Vec<(Option<usize>, GridColumn)> = Vec::new();
        let mut scrollable: Vec<(Option<usize>, GridColumn)> = Vec::new();
        for entry in tagged {
            if entry.1.frozen {
                frozen.push(entry);
            } else {
                scrollable.push(entry);
            }
        }
        let frozen_count = frozen.len();
        frozen.extend(scrollable);

        let has_select_column = frozen.first().is_some_and(|(_, c)| c.is_select());

        let mut columns = Vec::with_capacity(frozen.len());
        let mut data_indices = Vec::with_capacity(frozen.len());
        let mut x_offsets = Vec::with_capacity(frozen.len() + 1);
        let mut x = 0usize;
        for (data_idx, col) in frozen {
            x_offsets.push(x);
            x += col.width as usize;
            data_indices.push(data_idx);
            columns.push(col);
        }
        x_offsets.push(x);

        Self {
            columns,
            data_indices,
            x_offsets,
            frozen_count,
            has_select_column,
        }
    }

    pub fn column(&self, idx: usize) -> Option<&GridColumn> {
        self.columns.get(idx)
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn frozen_count(&self) -> usize {
        self.frozen_count
    }

    /// Total width of the frozen prefix
    pub fn frozen_width(&self) -> usize {
        self.x_offsets[self.frozen_count]
    }

    pub fn total_width(&self) -> usize {
        *self.x_offsets.last().unwrap_or(&0)
    }

    /// Left edge of a column in content coordinates
    pub fn x_offset(&self, idx: usize) -> usize {
        self.x_offsets.get(idx).copied().unwrap_or(0)
    }

    pub fn width(&self, idx: usize) -> u16 {
        self.columns.get(idx).map(|c| c.width).unwrap_or(0)
    }

    pub fn has_select_column(&self) -> bool {
        self.has_select_column
    }

    /// Position of this column's value in the underlying data rows.
    /// None for the select column, which has no backing data.
    pub fn data_index(&self, idx: usize) -> Option<usize> {
        self.data_indices.get(idx).copied().flatten()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn is_frozen(&self, idx: usize) -> bool {
        idx < self.frozen_count
    }
}
