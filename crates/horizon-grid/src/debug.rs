//! Text rendering of a view tree, for logs and debugging.
//!
//! ```
//! use horizon_grid::debug::{TreeFormatOptions, TreeStyle, ViewTreeDebug};
//! use horizon_grid::{GridConfig, HierarchicalDataEngine};
//! use horizon_grid::model::Column;
//! use serde_json::json;
//!
//! let mut engine = HierarchicalDataEngine::new(GridConfig::default(), vec![Column::new("name", "Name")]);
//! engine.set_data_json(json!([
//!     {"id": "red", "name": "red", "children": [{"id": "innerRed1", "name": "inner red1"}]},
//!     {"id": "black", "name": "black"},
//! ])).unwrap();
//!
//! let options = TreeFormatOptions { style: TreeStyle::Ascii, show_ids: false, ..Default::default() };
//! let text = ViewTreeDebug::with_options(options).label_column("name").format(&engine.view());
//! assert_eq!(text, "red\n+-- inner red1\nblack\n");
//! ```

use std::fmt::{self, Write};

use crate::engine::TreeSnapshot;
use crate::model::FlatRow;

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indented lines with a dash marker.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show row ids.
    pub show_ids: bool,
    /// Whether to show the child-list key a row was found under.
    pub show_child_keys: bool,
    /// Maximum depth to print (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_child_keys: false,
            max_depth: None,
            indent_size: 3,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_child_keys: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            ..Default::default()
        }
    }
}

/// Renders a [`TreeSnapshot`] as an indented tree.
#[derive(Debug, Clone, Default)]
pub struct ViewTreeDebug {
    options: TreeFormatOptions,
    label_column: Option<String>,
}

impl ViewTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self {
            options,
            label_column: None,
        }
    }

    /// Uses the text of `key` as each row's label instead of its id.
    pub fn label_column(mut self, key: impl Into<String>) -> Self {
        self.label_column = Some(key.into());
        self
    }

    /// Formats the whole view.
    pub fn format(&self, snapshot: &TreeSnapshot) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_rows(&mut output, snapshot, &snapshot.flatten());
        output
    }

    /// Formats the view with a one-line header.
    pub fn format_with_header(&self, snapshot: &TreeSnapshot) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "View r{} ({} rows, filter {:?}, sort {} {}):",
            snapshot.revision(),
            snapshot.row_count(),
            snapshot.filter_text(),
            snapshot.sort().column.as_deref().unwrap_or("-"),
            snapshot.sort().direction,
        );
        if snapshot.is_empty() {
            output.push_str("  (empty)\n");
        } else {
            let _ = self.write_rows(&mut output, snapshot, &snapshot.flatten());
        }
        output
    }

    fn write_rows(
        &self,
        out: &mut impl Write,
        snapshot: &TreeSnapshot,
        rows: &[FlatRow<'_>],
    ) -> fmt::Result {
        // more_siblings[d] is true while the current ancestor at depth d has
        // siblings still to come.
        let mut more_siblings: Vec<bool> = Vec::new();

        for flat in rows {
            if self.options.max_depth.is_some_and(|max| flat.depth > max) {
                continue;
            }
            more_siblings.truncate(flat.depth);

            out.write_str(&self.build_prefix(&more_siblings, flat))?;
            let id = flat.row.id(snapshot.id_key());
            match &self.label_column {
                Some(key) => out.write_str(&flat.row.text(key))?,
                None => out.write_str(id.as_ref().map(|id| id.as_str()).unwrap_or("(no id)"))?,
            }
            if self.options.show_ids
                && self.label_column.is_some()
                && let Some(id) = &id
            {
                write!(out, " [{id}]")?;
            }
            if self.options.show_child_keys
                && let Some(key) = flat.child_key
            {
                write!(out, " <{key}>")?;
            }
            out.write_char('\n')?;

            more_siblings.push(!flat.is_last_child);
        }
        Ok(())
    }

    fn build_prefix(&self, more_siblings: &[bool], flat: &FlatRow<'_>) -> String {
        if flat.depth == 0 {
            return String::new();
        }

        let indent = self.options.indent_size;
        if self.options.style == TreeStyle::Compact {
            return format!("{}- ", " ".repeat((flat.depth - 1) * indent));
        }

        let (branch, tee, corner, dash) = match self.options.style {
            TreeStyle::Ascii => ("|", "+", "+", "-"),
            _ => ("\u{2502}", "\u{251c}", "\u{2514}", "\u{2500}"),
        };

        let mut prefix = String::new();
        for &more in more_siblings.iter().skip(1) {
            if more {
                prefix.push_str(branch);
                prefix.push_str(&" ".repeat(indent));
            } else {
                prefix.push_str(&" ".repeat(indent + 1));
            }
        }
        prefix.push_str(if flat.is_last_child && self.options.style != TreeStyle::Ascii {
            corner
        } else {
            tee
        });
        prefix.push_str(&dash.repeat(indent.saturating_sub(1)));
        prefix.push(' ');
        prefix
    }
}
