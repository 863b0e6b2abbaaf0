//! The hierarchical data engine.
//!
//! [`HierarchicalDataEngine`] owns a row tree and recomputes a filtered,
//! sorted view of it whenever the data, filter, sort or columns change. Each
//! recompute runs filter, then sort, then selection pruning, and publishes
//! the result as a new immutable [`TreeSnapshot`].
//!
//! # Signals
//!
//! - `view_changed`: Emitted after every recompute with the new snapshot
//! - `selection_changed`: Emitted after every selection change (including
//!   pruning) with the full selected rows, in display order
//! - `filter_requested`: Emitted in [`DataMode::External`] when the filter text changes
//! - `sort_requested`: Emitted in [`DataMode::External`] when the sort changes
//!
//! # Example
//!
//! ```
//! use horizon_grid::{GridConfig, HierarchicalDataEngine};
//! use horizon_grid::model::{Column, SortDirection};
//! use serde_json::json;
//!
//! let mut engine = HierarchicalDataEngine::new(
//!     GridConfig::default(),
//!     vec![Column::new("name", "Name")],
//! );
//! engine.selection_changed.connect(|rows| {
//!     println!("{} rows selected", rows.len());
//! });
//!
//! engine.set_data_json(json!([
//!     {"id": "grey", "name": "grey"},
//!     {"id": "black", "name": "black"},
//!     {"id": "red", "name": "red", "children": [{"id": "innerRed1", "name": "inner red1"}]},
//! ])).unwrap();
//!
//! let view = engine.set_sort("name", SortDirection::Ascending);
//! let names: Vec<_> = view.rows().iter().map(|r| r.text("name")).collect();
//! assert_eq!(names, ["black", "grey", "red"]);
//!
//! engine.set_filter("red");
//! engine.select_all();
//! assert_eq!(engine.get_selected().len(), 2);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use horizon_grid_core::logging::{span_names, targets};
use horizon_grid_core::{PerfSpan, Signal};
use serde_json::Value;

use crate::config::{DataMode, GridConfig};
use crate::error::GridResult;
use crate::model::{
    Column, ColumnSet, FilterPattern, FlatRow, Row, RowId, SelectionMode, SelectionModel,
    SortDirection, SortState, filter_tree_with, flatten_rows, flatten_rows_collapsed, sort_tree,
};

/// An immutable, fully computed view of the data.
///
/// Snapshots are shared through `Arc`; a reader holding one keeps seeing the
/// same rows no matter what the engine does afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    revision: u64,
    rows: Vec<Row>,
    filter_text: String,
    sort: SortState,
    child_keys: Vec<String>,
    id_key: String,
}

impl TreeSnapshot {
    fn empty(config: &GridConfig) -> Self {
        Self {
            revision: 0,
            rows: Vec::new(),
            filter_text: String::new(),
            sort: SortState::unsorted(),
            child_keys: config.child_keys.clone(),
            id_key: config.id_key.clone(),
        }
    }

    /// Increases by one on every recompute.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The filtered, sorted top-level rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The filter text this view was computed with.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// The sort actually applied to this view.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// The child-list keys used to walk this view.
    pub fn child_keys(&self) -> &[String] {
        &self.child_keys
    }

    /// The identifier field used for selection.
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Returns true if the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows in the view, descendants included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
            + self
                .rows
                .iter()
                .map(|row| row.descendant_count(&self.child_keys))
                .sum::<usize>()
    }

    /// Depth-first display rows.
    pub fn flatten(&self) -> Vec<FlatRow<'_>> {
        flatten_rows(&self.rows, &self.child_keys, &self.id_key)
    }

    /// Depth-first display rows, skipping the descendants of collapsed rows.
    pub fn flatten_collapsed(&self, collapsed: &HashSet<RowId>) -> Vec<FlatRow<'_>> {
        flatten_rows_collapsed(&self.rows, &self.child_keys, &self.id_key, collapsed)
    }

    /// Identifiers of every row in the view, in display order. Rows without
    /// an identifier are skipped.
    pub fn visible_ids(&self) -> Vec<RowId> {
        self.flatten()
            .iter()
            .filter_map(|flat| flat.row.id(&self.id_key))
            .collect()
    }

    /// Finds the first row, in display order, with the given identifier.
    pub fn find(&self, id: &RowId) -> Option<&Row> {
        self.flatten()
            .into_iter()
            .find(|flat| flat.row.id(&self.id_key).as_ref() == Some(id))
            .map(|flat| flat.row)
    }

    /// The view as a JSON array, child lists nested under their keys.
    pub fn to_json(&self) -> Value {
        Value::Array(self.rows.iter().map(Row::to_json).collect())
    }
}

static_assertions::assert_impl_all!(TreeSnapshot: Send, Sync);

/// Filters, sorts and tracks selection over a hierarchical dataset.
///
/// All operations are synchronous: when a method returns, the new snapshot
/// is in place and every signal it triggers has already run.
pub struct HierarchicalDataEngine {
    config: GridConfig,
    columns: ColumnSet,
    source: Vec<Row>,
    filter_text: String,
    /// Sort as requested by the caller; see [`Self::effective_sort`].
    sort: SortState,
    selection: SelectionModel,
    snapshot: Arc<TreeSnapshot>,

    /// Emitted after every recompute.
    pub view_changed: Signal<Arc<TreeSnapshot>>,
    /// Emitted after every selection change with the selected rows.
    pub selection_changed: Signal<Vec<Row>>,
    /// Emitted in external mode with the new filter text.
    pub filter_requested: Signal<String>,
    /// Emitted in external mode with the new sort state.
    pub sort_requested: Signal<SortState>,
}

impl HierarchicalDataEngine {
    /// Creates an engine with no data.
    pub fn new(config: GridConfig, columns: Vec<Column>) -> Self {
        let selection = SelectionModel::with_mode(config.selection_mode);
        let snapshot = Arc::new(TreeSnapshot::empty(&config));
        Self {
            config,
            columns: ColumnSet::new(columns),
            source: Vec::new(),
            filter_text: String::new(),
            sort: SortState::unsorted(),
            selection,
            snapshot,
            view_changed: Signal::new(),
            selection_changed: Signal::new(),
            filter_requested: Signal::new(),
            sort_requested: Signal::new(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The engine configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The configured columns and their visibility.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// The unfiltered source rows.
    pub fn data(&self) -> &[Row] {
        &self.source
    }

    /// The current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// The sort state as requested, whether or not it could be applied.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// The sort state actually applied to the view.
    ///
    /// A sort on a column that is not configured is ignored locally. In
    /// external mode the requested state is trusted as-is.
    pub fn effective_sort(&self) -> SortState {
        if self.config.data_mode == DataMode::External || !self.sort.is_active() {
            return self.sort.clone();
        }
        match self.sort.column.as_deref() {
            Some(column) if self.columns.contains(column) => self.sort.clone(),
            _ => SortState::unsorted(),
        }
    }

    /// The current snapshot.
    pub fn view(&self) -> Arc<TreeSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// The underlying selection model, for observing selection deltas.
    pub fn selection_model(&self) -> &SelectionModel {
        &self.selection
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replaces the dataset and recomputes the view.
    pub fn set_data(&mut self, rows: Vec<Row>) -> Arc<TreeSnapshot> {
        tracing::debug!(target: targets::ENGINE, top_level = rows.len(), "dataset replaced");
        self.source = rows;
        self.recompute()
    }

    /// Replaces the dataset from a JSON array of row objects.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRow`](crate::GridError::InvalidRow) if
    /// `value` is not an array. Non-object entries are skipped.
    pub fn set_data_json(&mut self, value: Value) -> GridResult<Arc<TreeSnapshot>> {
        let rows = Row::rows_from_json(value, &self.config.child_keys)?;
        Ok(self.set_data(rows))
    }

    /// Switches between local and external filtering and sorting.
    pub fn set_data_mode(&mut self, mode: DataMode) -> Arc<TreeSnapshot> {
        if self.config.data_mode == mode {
            return self.view();
        }
        tracing::debug!(target: targets::ENGINE, ?mode, "data mode changed");
        self.config.data_mode = mode;
        self.recompute()
    }

    /// Recomputes the view from the current state.
    pub fn refresh(&mut self) -> Arc<TreeSnapshot> {
        self.recompute()
    }

    // =========================================================================
    // Filter
    // =========================================================================

    /// Sets the filter text. Empty text shows every row.
    ///
    /// In external mode the text is forwarded through `filter_requested` and
    /// the current view is returned unchanged.
    pub fn set_filter(&mut self, text: impl Into<String>) -> Arc<TreeSnapshot> {
        let text = text.into();
        if text == self.filter_text {
            return self.view();
        }
        tracing::debug!(target: targets::ENGINE, filter = %text, "filter changed");
        self.filter_text = text;

        match self.config.data_mode {
            DataMode::Local => self.recompute(),
            DataMode::External => {
                self.filter_requested.emit(self.filter_text.clone());
                self.view()
            }
        }
    }

    /// Clears the filter text.
    pub fn clear_filter(&mut self) -> Arc<TreeSnapshot> {
        self.set_filter(String::new())
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Sorts by `column` in `direction`.
    pub fn set_sort(
        &mut self,
        column: impl Into<String>,
        direction: SortDirection,
    ) -> Arc<TreeSnapshot> {
        self.set_sort_state(SortState::new(column, direction))
    }

    /// Applies a sort state.
    ///
    /// In external mode the state is forwarded through `sort_requested` and
    /// the current view is returned unchanged.
    pub fn set_sort_state(&mut self, sort: SortState) -> Arc<TreeSnapshot> {
        if sort == self.sort {
            return self.view();
        }
        tracing::debug!(
            target: targets::ENGINE,
            column = ?sort.column,
            direction = %sort.direction,
            "sort changed"
        );
        self.sort = sort;

        match self.config.data_mode {
            DataMode::Local => self.recompute(),
            DataMode::External => {
                self.sort_requested.emit(self.sort.clone());
                self.view()
            }
        }
    }

    /// Advances the sort of `column` the way a header click does.
    pub fn toggle_sort(&mut self, column: &str) -> Arc<TreeSnapshot> {
        let next = self.sort.toggled(column);
        self.set_sort_state(next)
    }

    /// Restores hierarchy order.
    pub fn clear_sort(&mut self) -> Arc<TreeSnapshot> {
        self.set_sort_state(SortState::unsorted())
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Replaces the configured columns. All of them become visible.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> Arc<TreeSnapshot> {
        self.columns = ColumnSet::new(columns);
        self.recompute()
    }

    /// Sets which columns are visible, and in what order.
    pub fn set_visible_columns<I, S>(&mut self, keys: I) -> Arc<TreeSnapshot>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.columns.set_visible_columns(keys) {
            self.recompute()
        } else {
            self.view()
        }
    }

    /// Shows a configured column.
    pub fn show_column(&mut self, key: &str) -> Arc<TreeSnapshot> {
        if self.columns.show_column(key) {
            self.recompute()
        } else {
            self.view()
        }
    }

    /// Hides a column.
    pub fn hide_column(&mut self, key: &str) -> Arc<TreeSnapshot> {
        if self.columns.hide_column(key) {
            self.recompute()
        } else {
            self.view()
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Gets the selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.selection_mode()
    }

    /// Sets the selection mode, clearing a selection the new mode cannot hold.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        if self.selection.set_selection_mode(mode) {
            self.emit_selection();
        }
    }

    /// Selects every visible row.
    pub fn select_all(&mut self) {
        if self.selection.select_all() {
            self.emit_selection();
        }
    }

    /// Clears the selection.
    pub fn select_none(&mut self) {
        if self.selection.select_none() {
            self.emit_selection();
        }
    }

    /// Flips the selection of one visible row. Unknown ids are ignored.
    pub fn toggle(&mut self, id: impl Into<RowId>) {
        if self.selection.toggle(&id.into()) {
            self.emit_selection();
        }
    }

    /// Selects one visible row. Unknown ids are ignored.
    pub fn select(&mut self, id: impl Into<RowId>) {
        if self.selection.select(&id.into()) {
            self.emit_selection();
        }
    }

    /// Deselects one row.
    pub fn deselect(&mut self, id: impl Into<RowId>) {
        if self.selection.deselect(&id.into()) {
            self.emit_selection();
        }
    }

    /// Checks if a row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// The selected row ids, in display order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.selected_ids()
    }

    /// Number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selection.selected_count()
    }

    /// The selected rows, in display order.
    ///
    /// Rows are taken from the current view, so their children reflect the
    /// active filter and sort. When several rows share an id, the first one
    /// in display order is returned.
    pub fn get_selected(&self) -> Vec<Row> {
        if !self.selection.has_selection() {
            return Vec::new();
        }
        let id_key = self.snapshot.id_key();
        let mut seen = HashSet::new();
        self.snapshot
            .flatten()
            .into_iter()
            .filter_map(|flat| {
                let id = flat.row.id(id_key)?;
                (self.selection.is_selected(&id) && seen.insert(id)).then(|| flat.row.clone())
            })
            .collect()
    }

    fn emit_selection(&self) {
        let rows = self.get_selected();
        tracing::debug!(target: targets::SELECTION, selected = rows.len(), "selection changed");
        self.selection_changed.emit(rows);
    }

    // =========================================================================
    // Recompute
    // =========================================================================

    #[tracing::instrument(
        skip(self),
        target = "horizon_grid::engine",
        level = "trace",
        fields(revision = self.snapshot.revision())
    )]
    fn recompute(&mut self) -> Arc<TreeSnapshot> {
        let _perf = PerfSpan::new(span_names::RECOMPUTE);
        let sort = self.effective_sort();
        if sort != self.sort {
            tracing::debug!(
                target: targets::SORT,
                column = ?self.sort.column,
                "sort column is not configured, leaving rows unsorted"
            );
        }

        let rows = match self.config.data_mode {
            DataMode::Local => self.filter_and_sort(&sort),
            DataMode::External => self.source.clone(),
        };

        let snapshot = Arc::new(TreeSnapshot {
            revision: self.snapshot.revision() + 1,
            rows,
            filter_text: self.filter_text.clone(),
            sort,
            child_keys: self.config.child_keys.clone(),
            id_key: self.config.id_key.clone(),
        });
        self.snapshot = Arc::clone(&snapshot);

        let pruned = self.selection.set_visible_rows(snapshot.visible_ids());
        tracing::debug!(
            target: targets::ENGINE,
            revision = snapshot.revision(),
            top_level = snapshot.rows().len(),
            pruned,
            "view recomputed"
        );

        self.view_changed.emit(Arc::clone(&snapshot));
        if pruned {
            self.emit_selection();
        }
        snapshot
    }

    fn filter_and_sort(&self, sort: &SortState) -> Vec<Row> {
        let child_keys = &self.config.child_keys;
        let filtered = match FilterPattern::new(&self.filter_text, self.config.filter_syntax) {
            Some(pattern) => {
                let _perf = PerfSpan::new(span_names::FILTER);
                let columns = self.columns.filter_columns(self.config.filter_scope);
                filter_tree_with(&self.source, &pattern, &columns, child_keys)
            }
            None => self.source.clone(),
        };

        if sort.is_active() {
            let _perf = PerfSpan::new(span_names::SORT);
            sort_tree(&filtered, sort.column.as_deref(), sort.direction, child_keys)
        } else {
            filtered
        }
    }
}

static_assertions::assert_impl_all!(HierarchicalDataEngine: Send, Sync);
