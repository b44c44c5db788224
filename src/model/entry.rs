use serde::{Deserialize, Serialize};

/// Kind of a flat listing entry, as reported by the repository tree API.
///
/// Only `"tree"` marks a directory. Blobs, submodule commits and any type
/// the API adds later are all shown as files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Tree,
    #[serde(other)]
    Blob,
}

/// One `(path, type)` record of a recursive repository listing
///
/// Paths are slash-separated and relative to the repository root. Any extra
/// fields in the API payload (`mode`, `sha`, `size`, `url`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl FlatEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// A file entry
    pub fn blob(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Blob)
    }

    /// A directory entry
    pub fn tree(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Tree)
    }

    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Tree
    }

    /// Non-empty path segments, in order.
    ///
    /// Empty segments from leading, trailing or doubled slashes are skipped,
    /// so `"a//b/"` yields `["a", "b"]`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        path_segments(&self.path)
    }
}

/// Split a slash-separated path into its non-empty segments
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
