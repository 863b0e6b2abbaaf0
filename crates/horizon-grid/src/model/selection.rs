//! Selection model for the visible rows of a grid.
//!
//! This module provides [`SelectionModel`], which tracks which rows are
//! selected by [`RowId`]. The model only ever holds identifiers of rows that
//! are currently visible: whenever the visible set changes, selections that
//! fell out of view are dropped.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{RowId, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.set_visible_rows(["a", "b", "c"].map(RowId::from).to_vec());
//!
//! selection.select_all();
//! selection.toggle(&RowId::from("b"));
//! assert_eq!(selection.selected_count(), 2);
//!
//! // Listen for changes
//! selection.selection_changed.connect(|(selected, deselected)| {
//!     println!("Selection changed: +{} -{}", selected.len(), deselected.len());
//! });
//! ```

use std::collections::HashSet;

use horizon_grid_core::Signal;
use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::row::RowId;

/// Selection behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// No rows can be selected.
    NoSelection,
    /// At most one row is selected; selecting another replaces it.
    SingleSelection,
    /// Any number of rows can be selected (default).
    #[default]
    MultiSelection,
}

/// Manages row selection state.
///
/// # Signals
///
/// - `selection_changed`: Emitted when selection changes, with (selected, deselected) ids
pub struct SelectionModel {
    /// Current selection mode.
    mode: SelectionMode,

    /// Selected row ids.
    selected: HashSet<RowId>,

    /// Ids of the visible rows, in depth-first display order.
    visible: Vec<RowId>,

    /// Set view of `visible` for O(1) lookup.
    visible_set: HashSet<RowId>,

    /// Emitted when selection changes. Args: (selected, deselected)
    pub selection_changed: Signal<(Vec<RowId>, Vec<RowId>)>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    /// Creates an empty selection model in [`SelectionMode::MultiSelection`].
    pub fn new() -> Self {
        Self::with_mode(SelectionMode::default())
    }

    /// Creates an empty selection model with the given mode.
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
            visible: Vec::new(),
            visible_set: HashSet::new(),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Selection Mode
    // =========================================================================

    /// Gets the current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// Switching to `NoSelection` clears the selection. Switching to
    /// `SingleSelection` keeps the selection only if it holds at most one row.
    /// Returns true if the selection changed.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> bool {
        self.mode = mode;
        let incompatible = match mode {
            SelectionMode::NoSelection => !self.selected.is_empty(),
            SelectionMode::SingleSelection => self.selected.len() > 1,
            SelectionMode::MultiSelection => false,
        };
        incompatible && self.clear_selection()
    }

    // =========================================================================
    // Visible Rows
    // =========================================================================

    /// The visible row ids, in display order.
    pub fn visible_rows(&self) -> &[RowId] {
        &self.visible
    }

    /// Returns true if `id` belongs to a visible row.
    pub fn is_visible(&self, id: &RowId) -> bool {
        self.visible_set.contains(id)
    }

    /// Replaces the visible rows and drops selections that are no longer
    /// visible. Returns true if any selection was dropped.
    pub fn set_visible_rows(&mut self, visible: Vec<RowId>) -> bool {
        self.visible_set = visible.iter().cloned().collect();
        self.visible = visible;

        let pruned: Vec<RowId> = self
            .selected
            .iter()
            .filter(|id| !self.visible_set.contains(*id))
            .cloned()
            .collect();
        if pruned.is_empty() {
            return false;
        }

        for id in &pruned {
            self.selected.remove(id);
        }
        tracing::debug!(
            target: targets::SELECTION,
            pruned = pruned.len(),
            remaining = self.selected.len(),
            "dropped selections that are no longer visible"
        );
        self.selection_changed.emit((Vec::new(), pruned));
        true
    }

    // =========================================================================
    // Selection Queries
    // =========================================================================

    /// Checks if a row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns true if any rows are selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Returns the number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Returns the selected ids in visible display order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        let mut seen = HashSet::with_capacity(self.selected.len());
        self.visible
            .iter()
            .filter(|id| self.selected.contains(*id) && seen.insert(*id))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Selects a visible row. Unknown or hidden ids are ignored.
    ///
    /// In `SingleSelection` mode the row replaces any existing selection.
    pub fn select(&mut self, id: &RowId) -> bool {
        if self.mode == SelectionMode::NoSelection
            || !self.is_visible(id)
            || self.selected.contains(id)
        {
            return false;
        }

        let deselected: Vec<RowId> = if self.mode == SelectionMode::SingleSelection {
            self.selected.drain().collect()
        } else {
            Vec::new()
        };
        self.selected.insert(id.clone());
        self.selection_changed.emit((vec![id.clone()], deselected));
        true
    }

    /// Deselects a row. Returns true if it was selected.
    pub fn deselect(&mut self, id: &RowId) -> bool {
        if !self.selected.remove(id) {
            return false;
        }
        self.selection_changed.emit((Vec::new(), vec![id.clone()]));
        true
    }

    /// Flips the selection state of a visible row.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        if self.is_selected(id) {
            self.deselect(id)
        } else {
            self.select(id)
        }
    }

    /// Selects every visible row.
    ///
    /// Does nothing in `NoSelection` and `SingleSelection` modes.
    pub fn select_all(&mut self) -> bool {
        if self.mode != SelectionMode::MultiSelection {
            return false;
        }

        let mut newly_selected = Vec::new();
        for id in &self.visible {
            if self.selected.insert(id.clone()) {
                newly_selected.push(id.clone());
            }
        }
        if newly_selected.is_empty() {
            return false;
        }
        self.selection_changed.emit((newly_selected, Vec::new()));
        true
    }

    /// Clears all selection. Same as [`clear_selection`](Self::clear_selection).
    pub fn select_none(&mut self) -> bool {
        self.clear_selection()
    }

    /// Clears all selection. Returns true if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let deselected: Vec<RowId> = self.selected.drain().collect();
        self.selection_changed.emit((Vec::new(), deselected));
        true
    }
}

static_assertions::assert_impl_all!(SelectionModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn ids(names: &[&str]) -> Vec<RowId> {
        names.iter().map(|n| RowId::from(*n)).collect()
    }

    fn model_with(names: &[&str]) -> SelectionModel {
        let mut model = SelectionModel::new();
        model.set_visible_rows(ids(names));
        model
    }

    #[test]
    fn test_selection_model_creation() {
        let model = SelectionModel::new();
        assert_eq!(model.selection_mode(), SelectionMode::MultiSelection);
        assert!(!model.has_selection());
        assert!(model.visible_rows().is_empty());
    }

    #[test]
    fn test_select_all_then_toggle_one() {
        let mut model = model_with(&["1", "2", "3", "4", "5"]);
        assert!(model.select_all());
        assert_eq!(model.selected_count(), 5);

        assert!(model.toggle(&RowId::from("3")));
        assert_eq!(model.selected_ids(), ids(&["1", "2", "4", "5"]));
    }

    #[test]
    fn test_toggle_selection() {
        let mut model = model_with(&["a"]);
        let id = RowId::from("a");

        // Toggle on
        model.toggle(&id);
        assert!(model.is_selected(&id));

        // Toggle off
        model.toggle(&id);
        assert!(!model.is_selected(&id));
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let mut model = model_with(&["a"]);
        assert!(!model.select(&RowId::from("zzz")));
        assert!(!model.toggle(&RowId::from("zzz")));
        assert!(!model.has_selection());
    }

    #[test]
    fn test_clear_selection() {
        let mut model = model_with(&["a", "b"]);
        model.select_all();
        assert_eq!(model.selected_count(), 2);

        assert!(model.clear_selection());
        assert!(!model.has_selection());
        assert!(!model.clear_selection());

        model.select_all();
        assert!(model.select_none());
        assert!(model.selected_ids().is_empty());
    }

    #[test]
    fn test_single_selection_replaces() {
        let mut model = SelectionModel::with_mode(SelectionMode::SingleSelection);
        model.set_visible_rows(ids(&["a", "b"]));

        model.select(&RowId::from("a"));
        model.select(&RowId::from("b"));
        assert_eq!(model.selected_ids(), ids(&["b"]));

        assert!(!model.select_all());
        assert_eq!(model.selected_count(), 1);
    }

    #[test]
    fn test_no_selection_mode() {
        let mut model = SelectionModel::with_mode(SelectionMode::NoSelection);
        model.set_visible_rows(ids(&["a"]));

        model.select(&RowId::from("a"));
        model.select_all();
        assert!(!model.has_selection());
    }

    #[test]
    fn test_mode_change_clears_incompatible_selection() {
        let mut model = model_with(&["a", "b"]);
        model.select_all();

        assert!(model.set_selection_mode(SelectionMode::SingleSelection));
        assert!(!model.has_selection());

        model.select(&RowId::from("a"));
        assert!(!model.set_selection_mode(SelectionMode::SingleSelection));
        assert!(model.set_selection_mode(SelectionMode::NoSelection));
        assert!(!model.has_selection());
    }

    #[test]
    fn test_visible_change_prunes_selection() {
        let mut model = model_with(&["a", "b", "c"]);
        model.select_all();

        assert!(model.set_visible_rows(ids(&["c", "a"])));
        assert_eq!(model.selected_ids(), ids(&["c", "a"]));
        assert!(!model.is_selected(&RowId::from("b")));

        // Coming back into view does not restore the selection.
        assert!(!model.set_visible_rows(ids(&["a", "b", "c"])));
        assert!(!model.is_selected(&RowId::from("b")));
    }

    #[test]
    fn test_selected_ids_follow_visible_order_without_duplicates() {
        let mut model = model_with(&["x", "y", "x"]);
        model.select(&RowId::from("y"));
        model.select(&RowId::from("x"));
        assert_eq!(model.selected_ids(), ids(&["x", "y"]));
    }

    #[test]
    fn test_selection_signal() {
        let mut model = model_with(&["a", "b", "c"]);

        let selected_count = Arc::new(AtomicUsize::new(0));
        let deselected_count = Arc::new(AtomicUsize::new(0));
        let sel = selected_count.clone();
        let desel = deselected_count.clone();

        model.selection_changed.connect(move |(selected, deselected)| {
            sel.fetch_add(selected.len(), Ordering::SeqCst);
            desel.fetch_add(deselected.len(), Ordering::SeqCst);
        });

        model.select(&RowId::from("a"));
        model.select_all();
        model.set_visible_rows(ids(&["a"]));

        assert_eq!(selected_count.load(Ordering::SeqCst), 3);
        assert_eq!(deselected_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_signal_without_change() {
        let mut model = model_with(&["a"]);
        model.select(&RowId::from("a"));

        let emissions = Arc::new(AtomicUsize::new(0));
        let count = emissions.clone();
        model.selection_changed.connect(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });

        model.select(&RowId::from("a"));
        model.select_all();
        model.deselect(&RowId::from("b"));
        assert_eq!(emissions.load(Ordering::SeqCst), 0);
    }
}
