//! Horizon Grid - the data core of a hierarchical table.
//!
//! This crate filters, sorts and tracks selection over a tree of rows while
//! keeping the tree's parent/child structure intact:
//!
//! - **Filtering** keeps every row that matches the filter text, plus the
//!   ancestors needed to reach it
//! - **Sorting** reorders each group of siblings independently and stably
//! - **Selection** is keyed by row id and never outlives a row's visibility
//!
//! Rendering is left to the caller: the engine publishes immutable
//! [`TreeSnapshot`]s and a depth-first [`FlatRow`](model::FlatRow)
//! projection for a view layer to draw.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//! use serde_json::json;
//!
//! let config = GridConfig::default().with_child_keys(["groups", "devices"]);
//! let mut engine = HierarchicalDataEngine::new(
//!     config,
//!     vec![Column::new("name", "Name"), Column::new("ip", "IP Address")],
//! );
//!
//! engine.set_data_json(json!([
//!     {"id": "hq", "name": "HQ", "groups": [
//!         {"id": "lobby", "name": "Lobby", "devices": [
//!             {"id": "cam-1", "name": "Camera", "ip": "10.0.0.21"},
//!             {"id": "ap-1", "name": "Access Point", "ip": "10.0.0.2"},
//!         ]},
//!     ]},
//! ])).unwrap();
//!
//! let view = engine.set_filter("10.0.0.2");
//! for flat in view.flatten() {
//!     println!("{}{}", "  ".repeat(flat.depth), flat.row.text("name"));
//! }
//! ```

pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod model;
pub mod prelude;

pub use config::{DataMode, GridConfig};
pub use engine::{HierarchicalDataEngine, TreeSnapshot};
pub use error::{GridError, GridResult};

pub use horizon_grid_core::{ConnectionId, PerfSpan, Signal};
