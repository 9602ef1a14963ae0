//! File system walking

use ignore::WalkBuilder;
use std::path::Path;

use crate::scanner::{EntryKind, FileEntry};

/// Walk a directory and return an entry per file, directory and symlink,
/// with paths relative to the root.
pub fn walk_directory(root: &Path) -> Vec<FileEntry> {
    let mut entries = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .parents(true)
        .build();

    for entry in walker.flatten() {
        let path = entry.path();

        // Skip the root directory itself
        if path == root {
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .ok()
            .and_then(|p| p.to_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        if relative_path.is_empty() {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let size = match kind {
            EntryKind::File => entry.metadata().ok().map(|m| m.len()),
            _ => None,
        };

        entries.push(FileEntry {
            path: relative_path,
            kind,
            size,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_walk_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("test.txt"), "hello").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/nested.txt"), "world").unwrap();

        let entries = walk_directory(root);

        assert!(entries
            .iter()
            .any(|e| e.path == "test.txt" && e.kind == EntryKind::File));
        assert!(entries
            .iter()
            .any(|e| e.path == "subdir" && e.kind == EntryKind::Directory));
        assert!(entries
            .iter()
            .any(|e| (e.path == "subdir/nested.txt" || e.path == "subdir\\nested.txt")
                && e.size == Some(5)));
    }
}
