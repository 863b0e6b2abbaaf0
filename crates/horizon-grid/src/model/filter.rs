//! Structure-preserving text filter over a row tree.
//!
//! A row survives filtering if it matches the filter text itself or if any of
//! its descendants does. Surviving rows keep only the children that survive,
//! so every non-matching row in the output sits on the path to a match.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use horizon_grid_core::logging::targets;

use super::column::Column;
use super::row::{ChildList, Row, is_child_key};

/// How filter text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSyntax {
    /// Case-insensitive regular expression. Text that is not a valid pattern
    /// is matched literally instead.
    #[default]
    Pattern,
    /// Case-insensitive plain substring.
    Literal,
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    /// Lowercased needle, used when even the escaped pattern cannot be built.
    Substring(String),
}

/// Compiled filter text.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{FilterPattern, FilterSyntax};
///
/// let pattern = FilterPattern::new("^gr(e|a)y", FilterSyntax::Pattern).unwrap();
/// assert!(pattern.is_match("Grey"));
///
/// // Unbalanced brackets fall back to a literal match.
/// let literal = FilterPattern::new("[red", FilterSyntax::Pattern).unwrap();
/// assert!(literal.is_match("color [RED]"));
///
/// assert!(FilterPattern::new("", FilterSyntax::Pattern).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FilterPattern {
    text: String,
    matcher: Matcher,
}

impl FilterPattern {
    /// Compiles `text`. Returns `None` for empty text, which means "no filter".
    pub fn new(text: &str, syntax: FilterSyntax) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let compiled = match syntax {
            FilterSyntax::Pattern => build_case_insensitive(text).or_else(|err| {
                tracing::debug!(
                    target: targets::FILTER,
                    filter = text,
                    error = %err,
                    "filter is not a valid pattern, matching literally"
                );
                build_case_insensitive(&regex::escape(text))
            }),
            FilterSyntax::Literal => build_case_insensitive(&regex::escape(text)),
        };

        let matcher = match compiled {
            Ok(regex) => Matcher::Regex(regex),
            Err(err) => {
                tracing::debug!(
                    target: targets::FILTER,
                    error = %err,
                    "escaped filter rejected, using substring search"
                );
                Matcher::Substring(text.to_lowercase())
            }
        };

        Some(Self {
            text: text.to_string(),
            matcher,
        })
    }

    /// The filter text as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tests the default (non-custom) match against a display value.
    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(haystack),
            Matcher::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Tests one row against one column, honoring the column's custom matcher.
    pub fn matches_column(&self, row: &Row, column: &Column) -> bool {
        let display = column.display_value(row);
        match column.matcher() {
            Some(matcher) => matcher(&display, row, &self.text),
            None => self.is_match(&display),
        }
    }

    /// Tests a row against every column; any column matching is enough.
    pub fn matches_row(&self, row: &Row, columns: &[&Column]) -> bool {
        columns.iter().any(|column| self.matches_column(row, column))
    }
}

fn build_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Filters a row tree by free text, using [`FilterSyntax::Pattern`].
///
/// Empty `filter_text` returns a copy of `rows`. The input is never modified.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{filter_tree, Column, Row};
///
/// let rows = vec![
///     Row::new().with_field("name", "red").with_children("children", vec![
///         Row::new().with_field("name", "inner red1"),
///     ]),
///     Row::new().with_field("name", "black"),
/// ];
/// let columns = vec![Column::new("name", "Name")];
///
/// let result = filter_tree(&rows, "black", &columns, &["children"]);
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].text("name"), "black");
/// ```
pub fn filter_tree<K: AsRef<str>>(
    rows: &[Row],
    filter_text: &str,
    columns: &[Column],
    child_keys: &[K],
) -> Vec<Row> {
    match FilterPattern::new(filter_text, FilterSyntax::Pattern) {
        Some(pattern) => {
            let columns: Vec<&Column> = columns.iter().collect();
            filter_tree_with(rows, &pattern, &columns, child_keys)
        }
        None => rows.to_vec(),
    }
}

/// Filters a row tree with a compiled pattern against the given columns.
#[tracing::instrument(
    skip_all,
    target = "horizon_grid::filter",
    level = "trace",
    fields(filter = pattern.text())
)]
pub fn filter_tree_with<K: AsRef<str>>(
    rows: &[Row],
    pattern: &FilterPattern,
    columns: &[&Column],
    child_keys: &[K],
) -> Vec<Row> {
    let filtered: Vec<Row> = rows
        .iter()
        .filter_map(|row| filter_row(row, pattern, columns, child_keys))
        .collect();
    tracing::trace!(
        target: targets::FILTER,
        top_level_in = rows.len(),
        top_level_out = filtered.len(),
        "filtered tree"
    );
    filtered
}

/// Resolves children first so a row can be kept for a matching descendant.
fn filter_row<K: AsRef<str>>(
    row: &Row,
    pattern: &FilterPattern,
    columns: &[&Column],
    child_keys: &[K],
) -> Option<Row> {
    let mut descendant_matched = false;
    let mut lists = Vec::with_capacity(row.child_lists().len());

    for list in row.child_lists() {
        if !is_child_key(list.key(), child_keys) {
            lists.push(list.clone());
            continue;
        }
        let kept: Vec<Row> = list
            .rows()
            .iter()
            .filter_map(|child| filter_row(child, pattern, columns, child_keys))
            .collect();
        descendant_matched |= !kept.is_empty();
        lists.push(ChildList::new(list.key(), kept));
    }

    if descendant_matched || pattern.matches_row(row, columns) {
        Some(row.with_child_lists(lists))
    } else {
        None
    }
}
