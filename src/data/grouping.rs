use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::data::datatable::DataTable;
use crate::data::row::{GridRow, GroupRow};

/// Flattened, order-stable view of the table under the current grouping.
///
/// Owns the expanded-group set and the flattened row sequence. The sequence
/// is depth-first: each group row followed by its (possibly further grouped)
/// children, with descendants of collapsed groups omitted. Order within a
/// level matches first appearance in the table; grouping never sorts.
///
/// The underlying table is never mutated; collapsing only changes which
/// flat indices exist.
pub struct GroupingView {
    table: Arc<DataTable>,
    /// Data column indices to group on, outermost first
    group_by: Vec<usize>,
    /// Group ids currently expanded. Mutated only by `toggle_group`;
    /// survives re-renders and is never reset by scrolling.
    expanded: HashSet<String>,
    flattened: Vec<GridRow>,
}

impl GroupingView {
    /// Create a view grouped on the given column keys (outermost first).
    /// Unknown keys are ignored; an empty list yields a flat view.
    pub fn new(table: Arc<DataTable>, group_by_keys: &[&str]) -> Self {
        let group_by: Vec<usize> = group_by_keys
            .iter()
            .filter_map(|key| table.get_column_index(key))
            .collect();
        let mut view = Self {
            table,
            group_by,
            expanded: HashSet::new(),
            flattened: Vec::new(),
        };
        view.rebuild();
        view
    }

    /// Flat view with no grouping
    pub fn ungrouped(table: Arc<DataTable>) -> Self {
        Self::new(table, &[])
    }

    pub fn table(&self) -> &Arc<DataTable> {
        &self.table
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    /// Number of rows in the flattened sequence
    pub fn row_count(&self) -> usize {
        self.flattened.len()
    }

    pub fn row(&self, flat_idx: usize) -> Option<&GridRow> {
        self.flattened.get(flat_idx)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.flattened
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded.contains(group_id)
    }

    /// Flip a group between expanded and collapsed.
    ///
    /// The flattened sequence length changes; any selection holding a flat
    /// index past the new end is stale and must be re-clamped by the
    /// selection machine before its next use.
    pub fn toggle_group(&mut self, group_id: &str) {
        if !self.expanded.remove(group_id) {
            self.expanded.insert(group_id.to_string());
        }
        debug!(target: "grouping",
               "toggle_group: id={:?} expanded={}", group_id, self.expanded.contains(group_id));
        self.rebuild();
    }

    /// Expand every group at every level
    pub fn expand_all(&mut self) {
        let mut all = HashSet::new();
        Self::collect_group_ids(
            &self.table,
            &self.group_by,
            &(0..self.table.row_count()).collect::<Vec<_>>(),
            0,
            "",
            &mut all,
        );
        self.expanded = all;
        self.rebuild();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let row_ids: Vec<usize> = (0..self.table.row_count()).collect();
        let mut flattened = Vec::with_capacity(row_ids.len());
        Self::flatten_level(
            &self.table,
            &self.group_by,
            &self.expanded,
            &row_ids,
            0,
            "",
            &mut flattened,
        );
        debug!(target: "grouping",
               "rebuild: {} base rows -> {} flat rows ({} groups expanded)",
               row_ids.len(), flattened.len(), self.expanded.len());
        self.flattened = flattened;
    }

    /// Partition `row_ids` by the group column at `level`, preserving first
    /// appearance order, and emit group rows interleaved with their children.
    fn flatten_level(
        table: &DataTable,
        group_by: &[usize],
        expanded: &HashSet<String>,
        row_ids: &[usize],
        level: usize,
        parent_id: &str,
        out: &mut Vec<GridRow>,
    ) {
        let Some(&group_col) = group_by.get(level) else {
            out.extend(row_ids.iter().map(|&id| GridRow::Leaf(id)));
            return;
        };

        for (key, children) in Self::partition(table, group_col, row_ids) {
            let id = if parent_id.is_empty() {
                key.clone()
            } else {
                format!("{}/{}", parent_id, key)
            };
            let is_expanded = expanded.contains(&id);
            out.push(GridRow::Group(GroupRow {
                id: id.clone(),
                group_key: key,
                level,
                child_rows: children.clone(),
                is_expanded,
            }));
            if is_expanded {
                Self::flatten_level(table, group_by, expanded, &children, level + 1, &id, out);
            }
        }
    }

    fn collect_group_ids(
        table: &DataTable,
        group_by: &[usize],
        row_ids: &[usize],
        level: usize,
        parent_id: &str,
        out: &mut HashSet<String>,
    ) {
        if level >= group_by.len() {
            return;
        }
        for (key, children) in Self::partition(table, group_by[level], row_ids) {
            let id = if parent_id.is_empty() {
                key
            } else {
                format!("{}/{}", parent_id, key)
            };
            Self::collect_group_ids(table, group_by, &children, level + 1, &id, out);
            out.insert(id);
        }
    }

    /// Insertion-order-stable partition of rows by a column's string value
    fn partition(
        table: &DataTable,
        group_col: usize,
        row_ids: &[usize],
    ) -> Vec<(String, Vec<usize>)> {
        let mut order: Vec<(String, Vec<usize>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for &row_id in row_ids {
            let key = table.value_string(row_id, group_col);
            match index.get(&key) {
                Some(&slot) => order[slot].1.push(row_id),
                None => {
                    index.insert(key.clone(), order.len());
                    order.push((key, vec![row_id]));
                }
            }
        }
        order
    }
}
