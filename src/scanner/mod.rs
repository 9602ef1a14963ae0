//! Scanner module - produces the file-tree snapshot the engine consumes
//!
//! The engine itself never walks the disk; it works from an immutable
//! [`FileTree`] snapshot. Snapshots are produced here for the CLI, or
//! constructed directly by callers embedding the engine.

mod filesystem;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What a tree entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

/// One entry in a file-tree snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the snapshot root.
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Size in bytes, for files.
    pub size: Option<u64>,
}

/// Immutable snapshot of a source tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTree {
    /// Absolute root the entry paths are relative to.
    pub root: PathBuf,
    /// Every discovered entry, in scan order.
    pub entries: Vec<FileEntry>,
    /// Number of file entries.
    pub file_count: usize,
    /// Number of directory entries.
    pub directory_count: usize,
}

impl FileTree {
    /// Build a snapshot from a list of entries.
    pub fn new(root: PathBuf, entries: Vec<FileEntry>) -> Self {
        let file_count = entries.iter().filter(|e| e.kind == EntryKind::File).count();
        let directory_count = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Directory)
            .count();
        Self {
            root,
            entries,
            file_count,
            directory_count,
        }
    }

    /// Every file path in the snapshot, in scan order.
    pub fn file_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.path.clone())
            .collect()
    }

    /// True when a file with this exact relative path exists.
    pub fn has_file(&self, path: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == EntryKind::File && e.path == path)
    }
}

/// Scan a directory into a snapshot.
pub fn scan(root: &Path) -> FileTree {
    let entries = filesystem::walk_directory(root);
    FileTree::new(root.to_path_buf(), entries)
}
