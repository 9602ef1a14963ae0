//! Eligible-file filtering
//!
//! Decides which files from a tree snapshot are subject to rule evaluation.
//! Exclusion is monotonic: once any check matches, the file is out.

use std::io::Read;
use std::path::Path;

use tracing::debug;

/// Extensions that identify binary files.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svgz", "pdf", "zip", "tar", "gz", "bz2",
    "xz", "7z", "rar", "exe", "dll", "so", "dylib", "bin", "class", "jar", "war", "pyc", "pyo",
    "wasm", "woff", "woff2", "ttf", "eot", "otf", "mp3", "mp4", "avi", "mov", "mkv", "sqlite",
    "db", "o", "a", "obj", "lib",
];

/// Directory names that are never worth auditing: dependency caches, build
/// output and version-control folders.
const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    "bower_components",
    ".git",
    ".svn",
    ".hg",
    "target",
    "dist",
    "build",
    "out",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    ".next",
    ".nuxt",
    ".cache",
    "coverage",
    ".idea",
    ".vscode",
];

/// Number of leading bytes inspected by the content sniff.
const SNIFF_LIMIT: usize = 8000;

/// True when the file's extension marks it as binary.
///
/// Handles the dotfile edge case where the whole basename is the extension:
/// a file literally named ".pdf" is treated as a PDF.
pub fn is_binary_by_extension(path: &str) -> bool {
    let basename = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);

    let extension = match basename.rfind('.') {
        // ".pdf" has its dot at position 0; the rest of the name is the
        // extension.
        Some(0) => &basename[1..],
        Some(pos) => &basename[pos + 1..],
        None => return false,
    };

    if extension.is_empty() {
        return false;
    }

    let extension = extension.to_lowercase();
    BINARY_EXTENSIONS.iter().any(|e| *e == extension)
}

/// True when any path segment names an excluded directory.
pub fn contains_skip_directory(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| SKIP_DIRECTORIES.iter().any(|d| *d == segment))
}

/// True when the first bytes of the file contain a zero byte.
///
/// Unreadable files are conservatively treated as binary so they never
/// reach rule evaluation.
pub fn is_binary_by_content(path: &Path) -> bool {
    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(error) => {
            debug!(path = %path.display(), %error, "content sniff failed, excluding file");
            return true;
        }
    };

    let mut buffer = [0u8; SNIFF_LIMIT];
    let read = match file.read(&mut buffer) {
        Ok(n) => n,
        Err(error) => {
            debug!(path = %path.display(), %error, "content sniff failed, excluding file");
            return true;
        }
    };

    buffer[..read].contains(&0)
}

/// Full exclusion decision for one file: extension, then directory, then
/// (when `deep_scan` is on) a content sniff, short-circuiting on the first
/// positive match.
pub fn should_exclude(root: &Path, path: &str, deep_scan: bool) -> bool {
    if is_binary_by_extension(path) {
        return true;
    }

    if contains_skip_directory(path) {
        return true;
    }

    if deep_scan && is_binary_by_content(&root.join(path)) {
        return true;
    }

    false
}
