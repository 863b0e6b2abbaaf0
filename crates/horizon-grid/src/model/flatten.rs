//! Depth-first flattening of a row tree into display rows.

use std::collections::HashSet;

use super::row::{Row, RowId, is_child_key};

/// A row in depth-first display order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow<'a> {
    /// The row itself, including its (already filtered and sorted) children.
    pub row: &'a Row,
    /// The depth (indentation level) of this row. Top-level rows are 0.
    pub depth: usize,
    /// Whether this row has children under any configured child key.
    pub has_children: bool,
    /// Whether this row is the last child of its parent.
    pub is_last_child: bool,
    /// The child-list key this row was found under (`None` at the top level).
    pub child_key: Option<&'a str>,
    /// Identifier of the parent row, if the parent has one.
    pub parent_id: Option<RowId>,
}

/// Flattens a row tree depth-first, parents before their children.
///
/// Child lists are visited in storage order and only when their key is in
/// `child_keys`. Parent ids are read from the `id_key` field.
pub fn flatten_rows<'a, K: AsRef<str>>(
    rows: &'a [Row],
    child_keys: &[K],
    id_key: &str,
) -> Vec<FlatRow<'a>> {
    let mut out = Vec::new();
    let ctx = Context {
        child_keys,
        id_key,
        collapsed: None,
    };
    ctx.flatten_into(&mut out, rows, 0, None, None);
    out
}

/// Like [`flatten_rows`], but does not descend into rows whose id is in
/// `collapsed`.
pub fn flatten_rows_collapsed<'a, K: AsRef<str>>(
    rows: &'a [Row],
    child_keys: &[K],
    id_key: &str,
    collapsed: &HashSet<RowId>,
) -> Vec<FlatRow<'a>> {
    let mut out = Vec::new();
    let ctx = Context {
        child_keys,
        id_key,
        collapsed: Some(collapsed),
    };
    ctx.flatten_into(&mut out, rows, 0, None, None);
    out
}

struct Context<'c, K> {
    child_keys: &'c [K],
    id_key: &'c str,
    collapsed: Option<&'c HashSet<RowId>>,
}

impl<K: AsRef<str>> Context<'_, K> {
    fn flatten_into<'a>(
        &self,
        out: &mut Vec<FlatRow<'a>>,
        rows: &'a [Row],
        depth: usize,
        child_key: Option<&'a str>,
        parent_id: Option<&RowId>,
    ) {
        let siblings: Vec<_> = rows.iter().map(|row| (child_key, row)).collect();
        self.flatten_siblings(out, &siblings, depth, parent_id);
    }

    /// Emits one parent's children. Siblings span every configured child
    /// list, so only the final entry across all lists is the last child.
    fn flatten_siblings<'a>(
        &self,
        out: &mut Vec<FlatRow<'a>>,
        siblings: &[(Option<&'a str>, &'a Row)],
        depth: usize,
        parent_id: Option<&RowId>,
    ) {
        let count = siblings.len();
        for (i, &(child_key, row)) in siblings.iter().enumerate() {
            let has_children = row.has_children_in(self.child_keys);
            out.push(FlatRow {
                row,
                depth,
                has_children,
                is_last_child: i + 1 == count,
                child_key,
                parent_id: parent_id.cloned(),
            });

            if !has_children {
                continue;
            }
            let id = row.id(self.id_key);
            if let (Some(collapsed), Some(id)) = (self.collapsed, id.as_ref())
                && collapsed.contains(id)
            {
                continue;
            }
            let children: Vec<_> = row
                .child_lists()
                .iter()
                .filter(|list| is_child_key(list.key(), self.child_keys))
                .flat_map(|list| list.rows().iter().map(move |child| (Some(list.key()), child)))
                .collect();
            self.flatten_siblings(out, &children, depth + 1, id.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<Row> {
        vec![
            Row::new()
                .with_field("id", "site")
                .with_children(
                    "groups",
                    vec![Row::new().with_field("id", "g1").with_children(
                        "devices",
                        vec![Row::new().with_field("id", "d1"), Row::new().with_field("id", "d2")],
                    )],
                )
                .with_children("devices", vec![Row::new().with_field("id", "d3")]),
            Row::new().with_field("id", "other"),
        ]
    }

    fn ids(flat: &[FlatRow<'_>]) -> Vec<String> {
        flat.iter().map(|f| f.row.text("id")).collect()
    }

    #[test]
    fn test_flatten_depth_first() {
        let rows = tree();
        let flat = flatten_rows(&rows, &["groups", "devices"], "id");
        assert_eq!(ids(&flat), vec!["site", "g1", "d1", "d2", "d3", "other"]);

        let depths: Vec<_> = flat.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 1, 0]);

        assert!(flat[0].has_children);
        assert!(!flat[5].has_children);
        assert!(flat[3].is_last_child);
        assert!(!flat[2].is_last_child);
        assert!(flat[4].is_last_child);
        assert!(flat[5].is_last_child);
        assert_eq!(flat[4].child_key, Some("devices"));
        assert_eq!(flat[1].child_key, Some("groups"));
        assert_eq!(flat[0].child_key, None);
        assert_eq!(flat[2].parent_id, Some(RowId::from("g1")));
        assert_eq!(flat[4].parent_id, Some(RowId::from("site")));
    }

    #[test]
    fn test_last_child_spans_child_lists() {
        let rows = tree();
        let flat = flatten_rows(&rows, &["groups", "devices"], "id");
        // g1 is the only group, but site still has d3 under "devices".
        assert_eq!(flat[1].row.text("id"), "g1");
        assert!(!flat[1].is_last_child);
        assert!(!flat[0].is_last_child);

        let groups_only = flatten_rows(&rows, &["groups"], "id");
        assert_eq!(ids(&groups_only), vec!["site", "g1", "other"]);
        assert!(groups_only[1].is_last_child);
    }

    #[test]
    fn test_flatten_ignores_unconfigured_keys() {
        let rows = tree();
        let flat = flatten_rows(&rows, &["devices"], "id");
        assert_eq!(ids(&flat), vec!["site", "d3", "other"]);
    }

    #[test]
    fn test_flatten_collapsed() {
        let rows = tree();
        let collapsed: HashSet<RowId> = [RowId::from("g1")].into_iter().collect();
        let flat = flatten_rows_collapsed(&rows, &["groups", "devices"], "id", &collapsed);
        assert_eq!(ids(&flat), vec!["site", "g1", "d3", "other"]);
        assert!(flat[1].has_children);
        assert_eq!(flat[1].parent_id, Some(RowId::from("site")));
        assert_eq!(flat[2].parent_id, Some(RowId::from("site")));
        assert_eq!(flat[0].parent_id, None);
    }

    #[test]
    fn test_flatten_empty() {
        let flat = flatten_rows(&[], &["children"], "id");
        assert!(flat.is_empty());
    }
}
