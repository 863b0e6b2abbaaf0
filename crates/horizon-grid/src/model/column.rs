//! Column descriptors and the visible column set.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::{Row, value_text};

/// Formats a field value for display. Receives the raw value (null when the
/// field is missing) and the whole row.
pub type FormatFn = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Custom filter test for one column. Receives the display value, the row and
/// the filter text; returns `true` on a match.
pub type MatchFn = Arc<dyn Fn(&str, &Row, &str) -> bool + Send + Sync>;

/// Which columns take part in filter matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterScope {
    /// Every configured column, visible or not.
    #[default]
    AllColumns,
    /// Only the currently visible columns.
    VisibleColumns,
}

/// Describes one field to display, filter and sort on.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{Column, Row};
///
/// let column = Column::new("mac", "MAC Address")
///     .with_width(160.0)
///     .with_format(|value, _row| value.as_str().unwrap_or_default().to_uppercase());
///
/// let row = Row::new().with_field("mac", "aa:bb:cc");
/// assert_eq!(column.display_value(&row), "AA:BB:CC");
/// ```
#[derive(Clone)]
pub struct Column {
    key: String,
    label: String,
    width: Option<f32>,
    format: Option<FormatFn>,
    matcher: Option<MatchFn>,
}

impl Column {
    /// Creates a column for the field `key`, shown with `label`.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            format: None,
            matcher: None,
        }
    }

    /// Sets a preferred width using builder pattern.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the display formatter using builder pattern.
    ///
    /// The formatter must be pure; it is used for rendering and for filter
    /// matching.
    pub fn with_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    /// Sets a custom filter matcher using builder pattern.
    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&str, &Row, &str) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// The row field this column reads.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The preferred width, if any.
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    /// Returns true if the column has a display formatter.
    pub fn has_format(&self) -> bool {
        self.format.is_some()
    }

    /// Returns the custom matcher, if any.
    pub fn matcher(&self) -> Option<&MatchFn> {
        self.matcher.as_ref()
    }

    /// Computes the display value of this column for `row`.
    pub fn display_value(&self, row: &Row) -> String {
        let value = row.field(&self.key).unwrap_or(&Value::Null);
        match &self.format {
            Some(format) => format(value, row),
            None => value_text(value),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("format", &self.format.is_some())
            .field("matcher", &self.matcher.is_some())
            .finish()
    }
}

/// The configured columns plus the ordered subset currently visible.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    visible: Vec<String>,
}

impl ColumnSet {
    /// Creates a column set with every column visible, in configured order.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut set = Self::default();
        for column in columns {
            if set.contains(column.key()) {
                tracing::debug!(
                    target: horizon_grid_core::logging::targets::MODEL,
                    key = column.key(),
                    "ignoring duplicate column key"
                );
                continue;
            }
            set.visible.push(column.key.clone());
            set.columns.push(column);
        }
        set
    }

    /// All configured columns, in configured order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of configured columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if no columns are configured.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a configured column by key.
    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns true if a column with this key is configured.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys of the visible columns, in display order.
    pub fn visible_keys(&self) -> &[String] {
        &self.visible
    }

    /// The visible columns, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Column> + '_ {
        self.visible.iter().filter_map(|key| self.get(key))
    }

    /// Returns true if the column is configured and visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.iter().any(|k| k == key)
    }

    /// Replaces the visible columns with `keys`, in the given order.
    ///
    /// Unknown and repeated keys are ignored. Returns true if the visible set
    /// or its order changed.
    pub fn set_visible_columns<I, S>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut visible: Vec<String> = Vec::new();
        for key in keys {
            let key = key.as_ref();
            if self.contains(key) && !visible.iter().any(|k| k == key) {
                visible.push(key.to_string());
            }
        }
        if visible == self.visible {
            return false;
        }
        self.visible = visible;
        true
    }

    /// Makes a configured column visible, appending it to the display order.
    pub fn show_column(&mut self, key: &str) -> bool {
        if !self.contains(key) || self.is_visible(key) {
            return false;
        }
        self.visible.push(key.to_string());
        true
    }

    /// Hides a column. Returns true if it was visible.
    pub fn hide_column(&mut self, key: &str) -> bool {
        let before = self.visible.len();
        self.visible.retain(|k| k != key);
        self.visible.len() != before
    }

    /// The columns that take part in filter matching for `scope`.
    pub fn filter_columns(&self, scope: FilterScope) -> Vec<&Column> {
        match scope {
            FilterScope::AllColumns => self.columns.iter().collect(),
            FilterScope::VisibleColumns => self.visible().collect(),
        }
    }
}
