use crate::model::entry::path_segments;
use crate::model::tree::{FileTree, NodeId, NodeKind, TreeNode};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Options for turning a built tree into a display structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Start with every directory expanded
    pub initially_expanded: bool,
}

/// Display state for one node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    /// Node in the underlying tree
    pub node: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Slash-joined path from the repository root, unique per node
    pub full_path: String,
    /// Nesting level (top-level entries are 0)
    pub depth: usize,
    /// Row index of the containing directory (None at top level)
    pub parent: Option<usize>,
    /// Only meaningful for directories; always false for files
    pub expanded: bool,
    /// Cleared when a search query excludes this node
    pub visible: bool,
}

impl RenderedNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Errors from toggling a node by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    /// No node has this path
    NotFound(String),
    /// The node is a file
    NotADirectory(String),
}

impl fmt::Display for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleError::NotFound(path) => write!(f, "No such path: {}", path),
            ToggleError::NotADirectory(path) => write!(f, "Not a directory: {}", path),
        }
    }
}

impl std::error::Error for ToggleError {}

/// A built tree together with its per-node display state
///
/// Rows are stored in pre-order with each directory level sorted
/// (directories first, then by name). Rows are created once per tree and
/// only their `expanded` and `visible` flags change afterwards, so a row
/// index stays valid until the next render.
#[derive(Debug, Clone)]
pub struct RenderedTree {
    tree: FileTree,
    rows: Vec<RenderedNode>,
    /// full_path to row index
    by_path: HashMap<String, usize>,
    /// Rows of top-level entries, in display order
    top_level: Vec<usize>,
    /// Child rows of every row, in display order (empty for files)
    child_rows: Vec<Vec<usize>>,
}

impl RenderedTree {
    /// Render a tree, taking ownership of it
    pub fn render(tree: FileTree, options: RenderOptions) -> Self {
        let mut rendered = Self {
            tree,
            rows: Vec::new(),
            by_path: HashMap::new(),
            top_level: Vec::new(),
            child_rows: Vec::new(),
        };

        let root = rendered.tree.root_id();
        let top = rendered.collect_rows(root, None, 0, String::new(), options);
        rendered.top_level = top;

        tracing::debug!(
            "Rendered tree: {} rows ({} directories)",
            rendered.rows.len(),
            rendered.directory_count()
        );
        rendered
    }

    /// Append rows for the children of `dir`, returning their row indices
    fn collect_rows(
        &mut self,
        dir: NodeId,
        parent_row: Option<usize>,
        depth: usize,
        prefix: String,
        options: RenderOptions,
    ) -> Vec<usize> {
        let children = sorted_children(&self.tree, dir);
        let mut indices = Vec::with_capacity(children.len());

        for child in children {
            let Some(node) = self.tree.get_node(child) else {
                continue;
            };
            let full_path = if prefix.is_empty() {
                node.name.clone()
            } else {
                format!("{}/{}", prefix, node.name)
            };
            let is_dir = node.is_dir();

            let row = self.rows.len();
            self.rows.push(RenderedNode {
                node: child,
                name: node.name.clone(),
                kind: node.kind(),
                full_path: full_path.clone(),
                depth,
                parent: parent_row,
                expanded: is_dir && options.initially_expanded,
                visible: true,
            });
            self.child_rows.push(Vec::new());
            self.by_path.insert(full_path.clone(), row);
            indices.push(row);

            if is_dir {
                let nested = self.collect_rows(child, Some(row), depth + 1, full_path, options);
                self.child_rows[row] = nested;
            }
        }

        indices
    }

    /// The tree this display was rendered from
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// All rows in pre-order, including collapsed and hidden ones
    pub fn rows(&self) -> &[RenderedNode] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RenderedNode] {
        &mut self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RenderedNode> {
        self.rows.get(index)
    }

    /// Row index of a path
    ///
    /// Empty segments are ignored, so `"src/"` finds `src`.
    pub fn index_of(&self, path: &str) -> Option<usize> {
        if let Some(&index) = self.by_path.get(path) {
            return Some(index);
        }
        let normalized: Vec<&str> = path_segments(path).collect();
        self.by_path.get(&normalized.join("/")).copied()
    }

    pub fn get(&self, path: &str) -> Option<&RenderedNode> {
        self.index_of(path).and_then(|i| self.rows.get(i))
    }

    /// Rows of top-level entries, sorted
    pub fn top_level(&self) -> &[usize] {
        &self.top_level
    }

    /// Child rows of a directory row, sorted
    pub fn children_of(&self, index: usize) -> &[usize] {
        self.child_rows
            .get(index)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Flip a directory between expanded and collapsed
    ///
    /// Returns the new expanded state.
    pub fn toggle(&mut self, path: &str) -> Result<bool, ToggleError> {
        let index = self.directory_index(path)?;
        let row = &mut self.rows[index];
        row.expanded = !row.expanded;
        tracing::trace!("Toggled '{}' -> expanded={}", row.full_path, row.expanded);
        Ok(row.expanded)
    }

    /// Expand or collapse a directory
    pub fn set_expanded(&mut self, path: &str, expanded: bool) -> Result<(), ToggleError> {
        let index = self.directory_index(path)?;
        self.rows[index].expanded = expanded;
        Ok(())
    }

    fn directory_index(&self, path: &str) -> Result<usize, ToggleError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| ToggleError::NotFound(path.to_string()))?;
        if !self.rows[index].is_dir() {
            return Err(ToggleError::NotADirectory(path.to_string()));
        }
        Ok(index)
    }

    /// Expand every directory
    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    /// Collapse every directory
    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    fn set_all_expanded(&mut self, expanded: bool) {
        for row in self.rows.iter_mut().filter(|r| r.kind == NodeKind::Directory) {
            row.expanded = expanded;
        }
    }

    /// Rows currently on screen, in display order
    ///
    /// A row is shown when it passes the search filter and every directory
    /// above it is expanded.
    pub fn display_rows(&self) -> Vec<usize> {
        let mut shown = Vec::new();
        self.collect_display(&self.top_level, &mut shown);
        shown
    }

    fn collect_display(&self, level: &[usize], shown: &mut Vec<usize>) {
        for &index in level {
            let row = &self.rows[index];
            if !row.visible {
                continue;
            }
            shown.push(index);
            if row.is_dir() && row.expanded {
                self.collect_display(&self.child_rows[index], shown);
            }
        }
    }

    /// Path to hand to the clipboard for a node, if it exists
    pub fn copy_path(&self, path: &str) -> Option<&str> {
        self.get(path).map(|row| row.full_path.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_dir()).count()
    }

    pub fn directory_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_dir()).count()
    }
}

/// Children of a directory in display order
pub fn sorted_children(tree: &FileTree, dir: NodeId) -> Vec<NodeId> {
    let Some(children) = tree.get_node(dir).and_then(|n| n.children()) else {
        return Vec::new();
    };

    let mut nodes: Vec<&TreeNode> = children
        .values()
        .filter_map(|&id| tree.get_node(id))
        .collect();
    nodes.sort_by(|a, b| compare_entries(a, b));
    nodes.into_iter().map(|n| n.id).collect()
}

/// Directories first, then by name
pub fn compare_entries(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => locale_cmp(&a.name, &b.name),
    }
}

/// Human-friendly name ordering
///
/// Names compare case-insensitively first. Names equal up to case put the
/// lowercase letter first at the first position where they differ, and
/// anything still tied falls back to byte order so the result is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| case_tiebreak(a, b))
        .then_with(|| a.cmp(b))
}

fn case_tiebreak(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        };
    }
    Ordering::Equal
}
