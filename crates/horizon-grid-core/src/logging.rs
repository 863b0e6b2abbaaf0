//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event emitted by the grid crates uses one of the [`targets`], so a
//! single subsystem can be enabled with a directive such as
//! `horizon_grid::filter=trace`.

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// Full filter/sort/prune recomputation.
    pub const RECOMPUTE: &str = "horizon_grid::recompute";
    /// Filter pass over the row tree.
    pub const FILTER: &str = "horizon_grid::filter";
    /// Sort pass over the row tree.
    pub const SORT: &str = "horizon_grid::sort";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Filter engine target.
    pub const FILTER: &str = "horizon_grid::filter";
    /// Sort engine target.
    pub const SORT: &str = "horizon_grid::sort";
    /// Selection tracker target.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Row model target (JSON conversion).
    pub const MODEL: &str = "horizon_grid::model";
    /// Orchestrator target.
    pub const ENGINE: &str = "horizon_grid::engine";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_grid::config";
    /// Performance spans.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_grid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level event on the core crate target.
#[macro_export]
macro_rules! grid_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_grid_core", $($arg)*)
    };
}

/// Debug-level event on the core crate target.
#[macro_export]
macro_rules! grid_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_grid_core", $($arg)*)
    };
}
