//! Grid configuration.
//!
//! A [`GridConfig`] describes the shape of the data (which fields hold child
//! rows, which field identifies a row) and how the engine behaves. It can be
//! built in code or loaded from a JSON or TOML file; every field is optional
//! in a file and falls back to its default.
//!
//! ```toml
//! child_keys = ["groups", "devices"]
//! id_key = "mac"
//! filter_syntax = "literal"
//! filter_scope = "visible_columns"
//! selection_mode = "single_selection"
//! data_mode = "external"
//! ```

use std::path::Path;

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::model::{FilterScope, FilterSyntax, SelectionMode};

/// Where filtering and sorting happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    /// The engine filters and sorts the dataset itself.
    #[default]
    Local,
    /// Filter and sort requests are forwarded to the caller, who supplies the
    /// already-processed dataset.
    External,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Field names that hold child rows, walked in this order.
    pub child_keys: Vec<String>,
    /// Field that identifies a row for selection.
    pub id_key: String,
    /// How filter text is interpreted.
    pub filter_syntax: FilterSyntax,
    /// Which columns take part in filter matching.
    pub filter_scope: FilterScope,
    /// Selection behavior.
    pub selection_mode: SelectionMode,
    /// Local or caller-driven filtering and sorting.
    pub data_mode: DataMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            child_keys: vec!["children".to_string()],
            id_key: "id".to_string(),
            filter_syntax: FilterSyntax::default(),
            filter_scope: FilterScope::default(),
            selection_mode: SelectionMode::default(),
            data_mode: DataMode::default(),
        }
    }
}

impl GridConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the child-list field names using builder pattern.
    pub fn with_child_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.child_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the identifier field using builder pattern.
    pub fn with_id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = key.into();
        self
    }

    /// Sets the filter syntax using builder pattern.
    pub fn with_filter_syntax(mut self, syntax: FilterSyntax) -> Self {
        self.filter_syntax = syntax;
        self
    }

    /// Sets the filter scope using builder pattern.
    pub fn with_filter_scope(mut self, scope: FilterScope) -> Self {
        self.filter_scope = scope;
        self
    }

    /// Sets the selection mode using builder pattern.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the data mode using builder pattern.
    pub fn with_data_mode(mut self, mode: DataMode) -> Self {
        self.data_mode = mode;
        self
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> GridResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file, choosing the format from its extension
    /// (`.json` or `.toml`).
    pub fn load(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> GridResult<Self> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(GridError::unsupported_format(path)),
        };

        let text = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let config = parse(&text)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            child_keys = ?config.child_keys,
            id_key = %config.id_key,
            "loaded grid configuration"
        );
        Ok(config)
    }
}
