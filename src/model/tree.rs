// Path tree reconstruction
//
// Rebuilds the directory hierarchy of a repository from the flat list of
// paths returned by a recursive tree listing. Nodes live in an arena and are
// addressed by `NodeId`; each directory keeps its children keyed by segment
// name.

use super::entry::{path_segments, EntryKind, FlatEntry};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Whether a node is a directory or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
}

impl From<EntryKind> for NodeKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Tree => NodeKind::Directory,
            EntryKind::Blob => NodeKind::File,
        }
    }
}

/// A node in the reconstructed tree
///
/// Directories always carry a (possibly empty) children map; files never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Path segment naming this node (empty for the root)
    pub name: String,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    kind: NodeKind,
    children: Option<BTreeMap<String, NodeId>>,
}

impl TreeNode {
    fn new(id: NodeId, name: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        let children = match kind {
            NodeKind::Directory => Some(BTreeMap::new()),
            NodeKind::File => None,
        };

        Self {
            id,
            name,
            parent,
            kind,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Check if this node is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Check if this node is a file
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Children keyed by segment name, `None` for files
    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        self.children.as_ref()
    }

    fn promote_to_directory(&mut self) {
        self.kind = NodeKind::Directory;
        self.children.get_or_insert_with(BTreeMap::new);
    }
}

/// Directory hierarchy rebuilt from a flat path listing
///
/// The root is an implicit unnamed directory. Building is deterministic:
/// the same entries in the same order always produce an identical tree,
/// node ids included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    /// All nodes, indexed by `NodeId`
    nodes: Vec<TreeNode>,
    /// Root node ID
    root_id: NodeId,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Create a tree holding only the root directory
    pub fn new() -> Self {
        let root_id = NodeId(0);
        Self {
            nodes: vec![TreeNode::new(
                root_id,
                String::new(),
                NodeKind::Directory,
                None,
            )],
            root_id,
        }
    }

    /// Build a tree from flat entries, processed in order
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a FlatEntry>,
    {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(entry);
        }
        tree
    }

    /// Insert one flat entry, returning the id of its leaf node
    ///
    /// Every segment except the last becomes a directory: an existing file
    /// node on the way is promoted. The last segment is created with the
    /// entry's kind only if it does not exist yet; an existing node keeps
    /// whatever kind it was given first. Entries without any non-empty
    /// segment are ignored.
    pub fn insert(&mut self, entry: &FlatEntry) -> Option<NodeId> {
        let segments: Vec<&str> = path_segments(&entry.path).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            tracing::trace!("Ignoring entry with empty path: {:?}", entry.path);
            return None;
        };

        let mut current = self.root_id;
        for segment in dirs {
            current = self.ensure_child(current, segment, NodeKind::Directory);
            let node = &mut self.nodes[current.0];
            if node.is_file() {
                tracing::debug!(
                    "Promoting '{}' to a directory for entry '{}'",
                    node.name,
                    entry.path
                );
                node.promote_to_directory();
            }
        }

        Some(self.ensure_child(current, leaf, entry.kind.into()))
    }

    /// Return the child called `name`, creating it with `kind` if absent
    fn ensure_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        if let Some(existing) = self.child(parent, name) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.nodes
            .push(TreeNode::new(id, name.to_string(), kind, Some(parent)));
        if let Some(children) = self.nodes[parent.0].children.as_mut() {
            children.insert(name.to_string(), id);
        }
        id
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get the root node
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root_id.0]
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Get all nodes, root first
    pub fn all_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.root().children().map_or(true, |c| c.is_empty())
    }

    /// Find the child of `dir` named `name`
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.get_node(dir)?.children()?.get(name).copied()
    }

    /// Find a node by its slash-separated path from the root
    ///
    /// Uses the same segment rules as building, so `"a//b"` finds `a/b`.
    /// The empty path resolves to the root.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        path_segments(path).try_fold(self.root_id, |current, segment| {
            self.child(current, segment)
        })
    }

    /// Get the parent chain for a node (from root to node)
    pub fn get_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            ancestors.push(node_id);
            current = self.get_node(node_id).and_then(|n| n.parent);
        }

        ancestors.reverse();
        ancestors
    }

    /// Get the depth of a node (root is 0)
    pub fn get_depth(&self, id: NodeId) -> usize {
        self.get_ancestors(id).len().saturating_sub(1)
    }

    /// Slash-joined names from the root down to and including `id`
    ///
    /// `lookup(&full_path(id))` always returns `Some(id)`.
    pub fn full_path(&self, id: NodeId) -> String {
        let names: Vec<&str> = self
            .get_ancestors(id)
            .into_iter()
            .skip(1)
            .filter_map(|ancestor| self.get_node(ancestor))
            .map(|node| node.name.as_str())
            .collect();
        names.join("/")
    }
}

/// Build the directory hierarchy for a listing
///
/// A missing listing yields an empty tree rather than an error.
pub fn build_file_tree(entries: Option<&[FlatEntry]>) -> FileTree {
    FileTree::from_entries(entries.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &FileTree, dir: NodeId) -> Vec<String> {
        tree.get_node(dir)
            .and_then(|n| n.children())
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_input() {
        let tree = build_file_tree(None);
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().is_dir());

        let tree = build_file_tree(Some(&[]));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_nested_paths() {
        let entries = vec![
            FlatEntry::blob("src/index.ts"),
            FlatEntry::blob("src/lib/util.ts"),
            FlatEntry::blob("README.md"),
        ];
        let tree = build_file_tree(Some(&entries));

        assert_eq!(names(&tree, tree.root_id()), vec!["README.md", "src"]);

        let src = tree.lookup("src").unwrap();
        assert!(tree.get_node(src).unwrap().is_dir());
        assert_eq!(names(&tree, src), vec!["index.ts", "lib"]);

        let util = tree.lookup("src/lib/util.ts").unwrap();
        assert!(tree.get_node(util).unwrap().is_file());
        assert!(tree.get_node(util).unwrap().children().is_none());
        assert_eq!(tree.get_depth(util), 3);
    }

    #[test]
    fn test_intermediate_segments_are_directories() {
        // The listing mentions only the file; the directories are implied
        let tree = FileTree::from_entries(&[FlatEntry::blob("a/b/c.txt")]);
        let a = tree.lookup("a").unwrap();
        let b = tree.lookup("a/b").unwrap();
        assert!(tree.get_node(a).unwrap().is_dir());
        assert!(tree.get_node(b).unwrap().is_dir());
    }

    #[test]
    fn test_directory_is_never_downgraded() {
        let tree = FileTree::from_entries(&[FlatEntry::blob("a/b"), FlatEntry::blob("a")]);
        let a = tree.lookup("a").unwrap();
        assert!(tree.get_node(a).unwrap().is_dir());
        assert_eq!(names(&tree, a), vec!["b"]);
    }

    #[test]
    fn test_file_promoted_when_used_as_directory() {
        let tree = FileTree::from_entries(&[FlatEntry::blob("a"), FlatEntry::blob("a/b")]);
        let a = tree.lookup("a").unwrap();
        assert!(tree.get_node(a).unwrap().is_dir());
        assert!(tree.lookup("a/b").is_some());
        // Nothing leaked to the root level
        assert_eq!(names(&tree, tree.root_id()), vec!["a"]);
    }

    #[test]
    fn test_first_leaf_declaration_wins() {
        let tree = FileTree::from_entries(&[FlatEntry::tree("docs"), FlatEntry::blob("docs")]);
        let docs = tree.lookup("docs").unwrap();
        assert!(tree.get_node(docs).unwrap().is_dir());

        let tree = FileTree::from_entries(&[FlatEntry::blob("docs"), FlatEntry::tree("docs")]);
        let docs = tree.lookup("docs").unwrap();
        assert!(tree.get_node(docs).unwrap().is_file());
    }

    #[test]
    fn test_empty_segments_collapse() {
        let tree = FileTree::from_entries(&[
            FlatEntry::blob("a//b"),
            FlatEntry::blob("/c/"),
            FlatEntry::blob("//"),
        ]);

        assert_eq!(tree.lookup("a/b"), tree.lookup("a//b"));
        assert!(tree.lookup("a/b").is_some());
        assert!(tree.lookup("c").is_some());
        assert_eq!(names(&tree, tree.root_id()), vec!["a", "c"]);
    }

    #[test]
    fn test_duplicates_do_not_create_nodes() {
        let tree = FileTree::from_entries(&[
            FlatEntry::tree("src"),
            FlatEntry::blob("src/main.rs"),
            FlatEntry::blob("src/main.rs"),
        ]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_full_path_round_trip() {
        let tree = FileTree::from_entries(&[
            FlatEntry::blob("src/lib/util.ts"),
            FlatEntry::tree("docs"),
            FlatEntry::blob("docs/guide.md"),
        ]);

        for node in tree.all_nodes() {
            let path = tree.full_path(node.id);
            assert_eq!(tree.lookup(&path), Some(node.id), "path {:?}", path);
        }
        assert_eq!(tree.full_path(tree.root_id()), "");
    }

    #[test]
    fn test_get_ancestors() {
        let tree = FileTree::from_entries(&[FlatEntry::blob("dir1/file1.txt")]);
        let dir1 = tree.lookup("dir1").unwrap();
        let file1 = tree.lookup("dir1/file1.txt").unwrap();

        let ancestors = tree.get_ancestors(file1);
        assert_eq!(ancestors, vec![tree.root_id(), dir1, file1]);
        assert_eq!(tree.get_depth(tree.root_id()), 0);
    }
}
