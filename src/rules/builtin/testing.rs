//! Builtin testing rules

use crate::error::CodewardenError;
use crate::rules::{Category, Detection, Rule, RuleContext, Severity};

/// Source extensions the missing-test heuristic applies to.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "py", "go"];

/// Flags source files with no recognizable companion test file.
///
/// Uses the cross-file context: the full repository file list is searched
/// for a test file mentioning the source file's stem.
pub struct MissingTestRule;

impl MissingTestRule {
    fn stem(path: &str) -> Option<&str> {
        let basename = path.rsplit(['/', '\\']).next()?;
        let stem = basename.split('.').next()?;
        if stem.is_empty() {
            None
        } else {
            Some(stem)
        }
    }

    fn is_test_file(path: &str) -> bool {
        let lowered = path.to_lowercase();
        lowered.contains(".test.")
            || lowered.contains(".spec.")
            || lowered.contains("_test.")
            || lowered.split(['/', '\\']).any(|segment| {
                segment == "tests" || segment == "test" || segment == "__tests__"
            })
    }

    fn is_checkable_source(path: &str) -> bool {
        let lowered = path.to_lowercase();
        let has_source_ext = SOURCE_EXTENSIONS
            .iter()
            .any(|ext| lowered.ends_with(&format!(".{ext}")));
        has_source_ext && !Self::is_test_file(path) && !lowered.ends_with(".d.ts")
    }
}

#[async_trait::async_trait]
impl Rule for MissingTestRule {
    fn id(&self) -> &str {
        "testing/missing-test"
    }

    fn name(&self) -> &str {
        "Source file without tests"
    }

    fn category(&self) -> Category {
        Category::Testing
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn description(&self) -> &str {
        "Flags source files that have no recognizable companion test file"
    }

    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError> {
        if !Self::is_checkable_source(&ctx.file_path) {
            return Ok(vec![]);
        }

        let Some(stem) = Self::stem(&ctx.file_path) else {
            return Ok(vec![]);
        };

        let has_test = ctx
            .all_files
            .iter()
            .any(|candidate| Self::is_test_file(candidate) && candidate.contains(stem));

        if has_test {
            return Ok(vec![]);
        }

        Ok(vec![Detection::new(
            format!("No test file found for '{}'", ctx.file_path),
            format!("Add a test file covering '{stem}' (e.g. {stem}.test.*)"),
        )])
    }
}
