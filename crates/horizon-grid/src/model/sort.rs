//! Stable, level-local sorting of a row tree.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use horizon_grid_core::logging::targets;

use super::row::{ChildList, Row, is_child_key};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
    /// Hierarchy order, as supplied.
    #[default]
    Unsorted,
}

impl SortDirection {
    /// Short name used when forwarding sort requests (`asc`, `desc`, `none`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
            Self::Unsorted => "none",
        }
    }

    /// The next direction in the header-click cycle.
    pub fn next(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Unsorted,
            Self::Unsorted => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    /// Key of the column to sort by.
    pub column: Option<String>,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl SortState {
    /// Creates a sort state.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// No sorting.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Returns true if this state reorders rows.
    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction != SortDirection::Unsorted
    }

    /// Direction shown on the header of `column`.
    pub fn direction_for(&self, column: &str) -> SortDirection {
        if self.column.as_deref() == Some(column) {
            self.direction
        } else {
            SortDirection::Unsorted
        }
    }

    /// The state after the header of `column` is clicked.
    ///
    /// A different column starts ascending; the same column cycles
    /// ascending, descending, unsorted.
    pub fn toggled(&self, column: &str) -> Self {
        if self.column.as_deref() == Some(column) {
            Self::new(column, self.direction.next())
        } else {
            Self::new(column, SortDirection::Ascending)
        }
    }
}

/// The comparison key of `row` for `column`: its lowercased text.
pub fn sort_key(row: &Row, column: &str) -> String {
    row.text(column).to_lowercase()
}

/// Sorts every sibling group of a row tree by one column.
///
/// Each level is sorted independently with the same column and direction;
/// rows never change parent. Ties keep their original relative order in both
/// directions.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{sort_tree, Row, SortDirection};
///
/// let rows: Vec<Row> = ["grey", "black", "red"]
///     .into_iter()
///     .map(|name| Row::new().with_field("name", name))
///     .collect();
///
/// let sorted = sort_tree(&rows, Some("name"), SortDirection::Ascending, &["children"]);
/// let names: Vec<_> = sorted.iter().map(|r| r.text("name")).collect();
/// assert_eq!(names, ["black", "grey", "red"]);
/// ```
#[tracing::instrument(
    skip_all,
    target = "horizon_grid::sort",
    level = "trace",
    fields(column = sort_column, %direction)
)]
pub fn sort_tree<K: AsRef<str>>(
    rows: &[Row],
    sort_column: Option<&str>,
    direction: SortDirection,
    child_keys: &[K],
) -> Vec<Row> {
    let column = match (sort_column, direction) {
        (Some(column), SortDirection::Ascending | SortDirection::Descending) => column,
        _ => return rows.to_vec(),
    };
    tracing::trace!(target: targets::SORT, column, %direction, "sorting tree");
    sort_level(rows, column, direction == SortDirection::Descending, child_keys)
}

/// Sorts one sibling group, then recurses into each row's child lists.
fn sort_level<K: AsRef<str>>(
    rows: &[Row],
    column: &str,
    descending: bool,
    child_keys: &[K],
) -> Vec<Row> {
    // The original index breaks ties, so the unstable sort stays stable.
    let mut decorated: Vec<(String, usize, &Row)> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (sort_key(row, column), index, row))
        .collect();

    decorated.sort_unstable_by(|a, b| {
        let by_key = if descending { b.0.cmp(&a.0) } else { a.0.cmp(&b.0) };
        by_key.then(a.1.cmp(&b.1))
    });

    decorated
        .into_iter()
        .map(|(_, _, row)| sort_children(row, column, descending, child_keys))
        .collect()
}

fn sort_children<K: AsRef<str>>(
    row: &Row,
    column: &str,
    descending: bool,
    child_keys: &[K],
) -> Row {
    let lists = row
        .child_lists()
        .iter()
        .map(|list| {
            if is_child_key(list.key(), child_keys) {
                ChildList::new(list.key(), sort_level(list.rows(), column, descending, child_keys))
            } else {
                list.clone()
            }
        })
        .collect();
    row.with_child_lists(lists)
}

/// Compares two rows by `column` the way [`sort_tree`] does, without the
/// tie-break.
pub fn compare_rows(a: &Row, b: &Row, column: &str) -> Ordering {
    sort_key(a, column).cmp(&sort_key(b, column))
}
