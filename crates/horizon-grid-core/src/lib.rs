//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces shared by the grid crates:
//!
//! - **Signal/Slot System**: Type-safe, synchronous observer notifications
//! - **Logging**: `tracing` targets, span names and a performance span guard
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that notifies when the selection size changes
//! let selection_changed = Signal::<usize>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = selection_changed.connect(|count| {
//!     println!("{} rows selected", count);
//! });
//!
//! // Emit the signal
//! selection_changed.emit(3);
//!
//! // Disconnect when done
//! selection_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
