//! Row model and the pure tree transforms behind the grid.
//!
//! Everything in this module works on immutable input: filtering and sorting
//! return new trees, and flattening borrows from the tree it walks. The
//! [`HierarchicalDataEngine`](crate::HierarchicalDataEngine) strings these
//! pieces together; they are public so callers can use them directly.
//!
//! # Core Types
//!
//! - `Row`: A key/value record with named child lists
//! - `RowId`: Stable identity of a row, used for selection
//! - `Column` / `ColumnSet`: Field descriptors and the visible subset
//! - `SortState`: Sort column plus direction
//! - `SelectionModel`: Selected row ids, kept within the visible rows
//! - `FlatRow`: A row in depth-first display order
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{filter_tree, sort_tree, flatten_rows, Column, Row, SortDirection};
//!
//! let rows = vec![
//!     Row::new().with_field("id", "red").with_field("name", "red").with_children(
//!         "children",
//!         vec![Row::new().with_field("id", "innerRed1").with_field("name", "inner red1")],
//!     ),
//!     Row::new().with_field("id", "black").with_field("name", "black"),
//!     Row::new().with_field("id", "grey").with_field("name", "grey"),
//! ];
//! let columns = vec![Column::new("name", "Name")];
//!
//! let filtered = filter_tree(&rows, "r", &columns, &["children"]);
//! let sorted = sort_tree(&filtered, Some("name"), SortDirection::Descending, &["children"]);
//!
//! let names: Vec<_> = flatten_rows(&sorted, &["children"], "id")
//!     .iter()
//!     .map(|flat| flat.row.text("name"))
//!     .collect();
//! assert_eq!(names, ["red", "inner red1", "grey"]);
//! ```
//!
//! # Data Flow
//!
//! ```text
//! source rows ──> filter_tree ──> sort_tree ──> flatten_rows ──> view
//!                                                    │
//!                                                    └──> SelectionModel
//!                                                         (visible ids)
//! ```

mod column;
mod filter;
mod flatten;
mod row;
pub mod selection;
mod sort;

pub use column::{Column, ColumnSet, FilterScope, FormatFn, MatchFn};
pub use filter::{FilterPattern, FilterSyntax, filter_tree, filter_tree_with};
pub use flatten::{FlatRow, flatten_rows, flatten_rows_collapsed};
pub use row::{ChildList, Row, RowId, value_text};
pub use selection::{SelectionMode, SelectionModel};
pub use sort::{SortDirection, SortState, compare_rows, sort_key, sort_tree};

