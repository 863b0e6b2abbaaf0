//! Error types for Horizon Grid.
//!
//! Filtering, sorting and selection never fail: malformed rows, bad filter
//! patterns and unknown identifiers all degrade to "no match" or a no-op.
//! Errors only exist at the loading boundary, where configuration and raw
//! JSON rows enter the grid.

use std::path::PathBuf;

/// Result type alias for grid operations.
pub type GridResult<T> = std::result::Result<T, GridError>;

/// Errors that can occur while loading configuration or rows.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A top-level row or row list was not the expected JSON shape.
    #[error("Invalid row data: expected {expected}, found {found}")]
    InvalidRow {
        expected: &'static str,
        found: &'static str,
    },

    /// JSON configuration could not be parsed.
    #[error("Invalid JSON configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("Invalid TOML configuration: {0}")]
    ConfigToml(#[from] toml::de::Error),

    /// The configuration file extension is not one we know how to parse.
    #[error("Unsupported configuration format for '{path}'")]
    UnsupportedFormat { path: PathBuf },

    /// File I/O error.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Create an invalid row error.
    pub fn invalid_row(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::InvalidRow {
            expected,
            found: json_kind(found),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
