//! Per-file evaluation context handed to rule checks

use std::sync::Arc;

use crate::profile::ProjectProfile;

/// Input for one (file, rule) evaluation.
///
/// One context is built per eligible file and shared across every rule that
/// runs against that file. The full repository file list is included so
/// rules can perform cross-file checks (e.g. "does a matching test file
/// exist"). Contexts are immutable once built.
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Repository-relative path of the file under evaluation.
    pub file_path: String,

    /// Full file content.
    pub content: String,

    /// Detected project profile.
    pub profile: Arc<ProjectProfile>,

    /// Every file path in the repository snapshot, including files that are
    /// themselves excluded from evaluation.
    pub all_files: Arc<Vec<String>>,
}

impl RuleContext {
    /// Build a context for a single file.
    pub fn new(
        file_path: impl Into<String>,
        content: impl Into<String>,
        profile: Arc<ProjectProfile>,
        all_files: Arc<Vec<String>>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
            profile,
            all_files,
        }
    }

    /// Iterate over content lines with 1-based line numbers.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.content
            .lines()
            .enumerate()
            .map(|(i, line)| (i as u32 + 1, line))
    }
}
