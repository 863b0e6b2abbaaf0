//! Commonly used types, for glob import.
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let engine = HierarchicalDataEngine::new(GridConfig::default(), vec![Column::new("name", "Name")]);
//! assert!(engine.view().is_empty());
//! ```

pub use crate::config::{DataMode, GridConfig};
pub use crate::engine::{HierarchicalDataEngine, TreeSnapshot};
pub use crate::error::{GridError, GridResult};
pub use crate::model::{
    Column, ColumnSet, FilterScope, FilterSyntax, FlatRow, Row, RowId, SelectionMode, SortDirection,
    SortState,
};
pub use horizon_grid_core::Signal;
