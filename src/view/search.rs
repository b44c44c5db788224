// Search filtering over a rendered tree
//
// A query hides every node whose own name does not contain it, except
// directories that lead to a match. Directories left on screen are opened
// so the matches can be seen, and stay open after the query is cleared.

use super::render::{RenderedNode, RenderedTree};
use std::collections::HashSet;

/// Result of evaluating a query against the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The normalized (trimmed, lowercased) query
    pub query: String,
    /// Paths that stay on screen, `None` when every node is shown
    pub visible: Option<HashSet<String>>,
    /// Number of nodes whose own name matched
    pub matches: usize,
}

impl SearchOutcome {
    fn show_all() -> Self {
        Self {
            query: String::new(),
            visible: None,
            matches: 0,
        }
    }

    /// True when no query is active
    pub fn is_inactive(&self) -> bool {
        self.visible.is_none()
    }

    pub fn is_visible(&self, path: &str) -> bool {
        self.visible.as_ref().map_or(true, |v| v.contains(path))
    }
}

/// Trim and lowercase a raw query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Every proper ancestor path of `path`, nearest first
///
/// `"a/b/c"` yields `"a/b"` then `"a"`.
pub fn parent_paths(path: &str) -> impl Iterator<Item = &str> {
    let mut rest = path;
    std::iter::from_fn(move || {
        let cut = rest.rfind('/')?;
        rest = &rest[..cut];
        Some(rest)
    })
}

/// Compute which nodes a query leaves on screen
pub fn filter(nodes: &[RenderedNode], query: &str) -> SearchOutcome {
    let query = normalize_query(query);
    if query.is_empty() {
        return SearchOutcome::show_all();
    }

    let mut visible = HashSet::new();
    let mut matches = 0;
    for node in nodes {
        if !node.name.to_lowercase().contains(&query) {
            continue;
        }
        matches += 1;
        visible.insert(node.full_path.clone());
        for parent in parent_paths(&node.full_path) {
            // Ancestors of an earlier match already brought their own parents
            if !visible.insert(parent.to_string()) {
                break;
            }
        }
    }

    SearchOutcome {
        query,
        visible: Some(visible),
        matches,
    }
}

impl RenderedTree {
    /// Apply a query to the display state
    ///
    /// Each call starts from scratch. An empty query shows every node and
    /// leaves expansion untouched.
    pub fn apply_search(&mut self, query: &str) -> SearchOutcome {
        let outcome = filter(self.rows(), query);

        for row in self.rows_mut() {
            row.visible = outcome.is_visible(&row.full_path);
            if row.visible && row.is_dir() && !outcome.is_inactive() {
                row.expanded = true;
            }
        }

        tracing::debug!(
            "Search {:?}: {} matches",
            outcome.query,
            outcome.matches
        );
        outcome
    }
}
