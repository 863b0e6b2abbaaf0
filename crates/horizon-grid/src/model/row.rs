//! Rows, row identifiers and child lists.
//!
//! A [`Row`] is an arbitrary key/value record. Values are JSON values, so rows
//! can come straight from a JSON payload or be assembled by hand. Nested rows
//! live in named child lists (`children`, `groups`, `devices`, ...); which
//! field names count as child lists is decided when the rows are built from
//! JSON and again by every traversal, through a `child_keys` slice.

use std::fmt;

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, GridResult, json_kind};

/// Stable identity of a row, taken from its identifier field.
///
/// String identifiers are used verbatim; numbers and booleans use their JSON
/// text form, so `{"id": 7}` and `{"id": "7"}` share the identifier `"7"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an identifier from a field value.
    ///
    /// Returns `None` for null, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(b) => Some(Self(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An ordered list of child rows stored under one field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChildList {
    key: String,
    rows: Vec<Row>,
}

impl ChildList {
    /// Creates a child list.
    pub fn new(key: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            key: key.into(),
            rows,
        }
    }

    /// The field name this list is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The child rows, in hierarchy order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// One entity in a hierarchical dataset.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{Row, RowId};
///
/// let row = Row::new()
///     .with_field("id", "red")
///     .with_field("name", "red")
///     .with_children("children", vec![
///         Row::new().with_field("id", "innerRed1").with_field("name", "inner red1"),
///     ]);
///
/// assert_eq!(row.id("id"), Some(RowId::from("red")));
/// assert_eq!(row.children("children").len(), 1);
/// assert_eq!(row.text("missing"), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Map<String, Value>,
    children: Vec<ChildList>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field using builder pattern.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    /// Adds or replaces a child list using builder pattern.
    pub fn with_children(mut self, key: impl Into<String>, rows: Vec<Row>) -> Self {
        self.set_children(key, rows);
        self
    }

    /// Sets a field value.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Sets the child list stored under `key`, keeping the position of an
    /// existing list with the same key.
    pub fn set_children(&mut self, key: impl Into<String>, rows: Vec<Row>) {
        let key = key.into();
        match self.children.iter_mut().find(|list| list.key == key) {
            Some(list) => list.rows = rows,
            None => self.children.push(ChildList::new(key, rows)),
        }
    }

    /// Returns a field value, or `None` when the row has no such field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns all plain (non-child-list) fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a field as text. Missing fields and nulls are empty strings.
    pub fn text(&self, key: &str) -> String {
        self.field(key).map(value_text).unwrap_or_default()
    }

    /// Returns the row identifier stored under `id_key`.
    pub fn id(&self, id_key: &str) -> Option<RowId> {
        self.field(id_key).and_then(RowId::from_value)
    }

    /// Returns every child list, in storage order.
    pub fn child_lists(&self) -> &[ChildList] {
        &self.children
    }

    /// Returns the children stored under `key` (empty if there are none).
    pub fn children(&self, key: &str) -> &[Row] {
        self.children
            .iter()
            .find(|list| list.key == key)
            .map(|list| list.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates the children reachable through the given child-list keys.
    pub fn children_in<'a, K: AsRef<str>>(
        &'a self,
        child_keys: &'a [K],
    ) -> impl Iterator<Item = &'a Row> + 'a {
        self.children
            .iter()
            .filter(move |list| is_child_key(&list.key, child_keys))
            .flat_map(|list| list.rows.iter())
    }

    /// Returns true if any of the given child lists is non-empty.
    pub fn has_children_in<K: AsRef<str>>(&self, child_keys: &[K]) -> bool {
        self.children_in(child_keys).next().is_some()
    }

    /// Counts every descendant reachable through the given child-list keys.
    pub fn descendant_count<K: AsRef<str>>(&self, child_keys: &[K]) -> usize {
        self.children_in(child_keys)
            .map(|child| 1 + child.descendant_count(child_keys))
            .sum()
    }

    /// Returns a copy of this row's fields with a new set of child lists.
    pub(crate) fn with_child_lists(&self, children: Vec<ChildList>) -> Row {
        Row {
            fields: self.fields.clone(),
            children,
        }
    }

    /// Builds a row from a JSON object.
    ///
    /// Fields named in `child_keys` whose value is an array become child lists
    /// (in `child_keys` order). A child-list field holding anything other than
    /// an array stays an ordinary field. Array entries that are not objects
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRow`] if `value` is not a JSON object.
    pub fn from_json<K: AsRef<str>>(value: Value, child_keys: &[K]) -> GridResult<Row> {
        match value {
            Value::Object(fields) => Ok(Self::from_object(fields, child_keys)),
            other => Err(GridError::invalid_row("object", &other)),
        }
    }

    /// Builds a list of rows from a JSON array of objects.
    ///
    /// Entries that are not objects are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRow`] if `value` is not a JSON array.
    pub fn rows_from_json<K: AsRef<str>>(value: Value, child_keys: &[K]) -> GridResult<Vec<Row>> {
        match value {
            Value::Array(items) => Ok(rows_from_items(items, child_keys, "<root>")),
            other => Err(GridError::invalid_row("array", &other)),
        }
    }

    fn from_object<K: AsRef<str>>(mut fields: Map<String, Value>, child_keys: &[K]) -> Row {
        let mut children = Vec::new();
        for key in child_keys {
            let key = key.as_ref();
            if !matches!(fields.get(key), Some(Value::Array(_))) {
                continue;
            }
            if let Some(Value::Array(items)) = fields.remove(key) {
                children.push(ChildList::new(key, rows_from_items(items, child_keys, key)));
            }
        }
        Row { fields, children }
    }

    /// Converts the row back to JSON, nesting child lists under their keys.
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        for list in &self.children {
            let rows = list.rows.iter().map(Row::to_json).collect();
            object.insert(list.key.clone(), Value::Array(rows));
        }
        Value::Object(object)
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn rows_from_items<K: AsRef<str>>(items: Vec<Value>, child_keys: &[K], field: &str) -> Vec<Row> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(Row::from_object(fields, child_keys)),
            other => {
                tracing::warn!(
                    target: targets::MODEL,
                    field,
                    kind = json_kind(&other),
                    "skipping child entry that is not an object"
                );
                None
            }
        })
        .collect()
}

/// Returns true if `key` is one of the configured child-list keys.
pub(crate) fn is_child_key<K: AsRef<str>>(key: &str, child_keys: &[K]) -> bool {
    child_keys.iter().any(|k| k.as_ref() == key)
}

/// Converts a field value to the text used for matching and sorting.
///
/// - null becomes the empty string
/// - strings are used as-is
/// - numbers and booleans use their JSON text
/// - arrays join their elements' text with `,`
/// - objects use their compact JSON encoding
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_builder() {
        let row = Row::new()
            .with_field("id", 7)
            .with_field("name", "grey")
            .with_children("children", vec![Row::new().with_field("id", 8)]);

        assert_eq!(row.id("id"), Some(RowId::from("7")));
        assert_eq!(row.text("name"), "grey");
        assert_eq!(row.children("children").len(), 1);
        assert!(row.children("groups").is_empty());
    }

    #[test]
    fn test_set_children_keeps_position() {
        let mut row = Row::new()
            .with_children("groups", vec![])
            .with_children("devices", vec![]);
        row.set_children("groups", vec![Row::new()]);

        let keys: Vec<_> = row.child_lists().iter().map(ChildList::key).collect();
        assert_eq!(keys, vec!["groups", "devices"]);
        assert_eq!(row.children("groups").len(), 1);
    }

    #[test]
    fn test_from_json_splits_child_lists() {
        let row = Row::from_json(
            json!({
                "id": "site",
                "groups": [{"id": "g1", "devices": [{"id": "d1"}]}],
                "devices": [{"id": "d2"}],
            }),
            &["groups", "devices"],
        )
        .unwrap();

        assert!(row.field("groups").is_none());
        assert_eq!(row.children("groups").len(), 1);
        assert_eq!(row.children("devices").len(), 1);
        assert_eq!(row.children("groups")[0].children("devices").len(), 1);
        assert_eq!(row.descendant_count(&["groups", "devices"]), 3);
    }

    #[test]
    fn test_from_json_non_array_child_field_is_plain_field() {
        let row = Row::from_json(json!({"id": 1, "children": "none"}), &["children"]).unwrap();
        assert_eq!(row.field("children"), Some(&json!("none")));
        assert!(!row.has_children_in(&["children"]));
    }

    #[test]
    fn test_from_json_skips_non_object_children() {
        let row =
            Row::from_json(json!({"children": [1, {"id": "a"}, null]}), &["children"]).unwrap();
        assert_eq!(row.children("children").len(), 1);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Row::from_json(json!("red"), &["children"]).unwrap_err();
        assert!(matches!(err, GridError::InvalidRow { found: "string", .. }));

        let err = Row::rows_from_json(json!({"id": 1}), &["children"]).unwrap_err();
        assert!(matches!(err, GridError::InvalidRow { expected: "array", .. }));
    }

    #[test]
    fn test_to_json_round_trip() {
        let source = json!({
            "id": "red",
            "name": "red",
            "children": [{"id": "innerRed1", "name": "inner red1"}],
        });
        let row = Row::from_json(source.clone(), &["children"]).unwrap();
        assert_eq!(row.to_json(), source);
        assert_eq!(serde_json::to_value(&row).unwrap(), source);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!("Red")), "Red");
        assert_eq!(value_text(&json!(["a", 1, null])), "a,1,");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_row_id_from_value() {
        assert_eq!(RowId::from_value(&json!("x")), Some(RowId::from("x")));
        assert_eq!(RowId::from_value(&json!(12)), Some(RowId::from("12")));
        assert_eq!(RowId::from_value(&json!(null)), None);
        assert_eq!(RowId::from_value(&json!([1])), None);
    }
}
