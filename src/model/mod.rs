//! Core data model for repository trees
//!
//! This module contains pure data structures with no I/O.

pub mod entry;
pub mod repo;
pub mod tree;

pub use entry::{EntryKind, FlatEntry};
pub use repo::{parse_github_url, FetchError, RepoId, RepoMetadata, RepoSnapshot};
pub use tree::{build_file_tree, FileTree, NodeId, NodeKind, TreeNode};
