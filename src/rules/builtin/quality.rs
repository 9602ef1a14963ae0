//! Builtin code-quality rules

use crate::error::CodewardenError;
use crate::rules::builtin::security::{has_extension, truncate};
use crate::rules::{Category, Detection, Rule, RuleContext, Severity};

/// Flags leftover debug logging in script files.
pub struct DebugLoggingRule;

const DEBUG_MARKERS: &[(&str, &[&str])] = &[
    ("console.log(", &["js", "jsx", "ts", "tsx"]),
    ("console.debug(", &["js", "jsx", "ts", "tsx"]),
    ("debugger", &["js", "jsx", "ts", "tsx"]),
    ("dbg!(", &["rs"]),
];

#[async_trait::async_trait]
impl Rule for DebugLoggingRule {
    fn id(&self) -> &str {
        "style/no-debug-logging"
    }

    fn name(&self) -> &str {
        "Leftover debug logging"
    }

    fn category(&self) -> Category {
        Category::Style
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn description(&self) -> &str {
        "Flags console.log, debugger statements and dbg! macros left in source files"
    }

    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError> {
        let mut detections = Vec::new();

        for (line_number, line) in ctx.numbered_lines() {
            let trimmed = line.trim_start();
            // Commented-out code is not a finding.
            if trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with('#') {
                continue;
            }
            for &(marker, extensions) in DEBUG_MARKERS {
                if line.contains(marker) && has_extension(&ctx.file_path, extensions) {
                    detections.push(
                        Detection::new(
                            format!("Debug statement '{}' left in source", marker.trim_end_matches('(')),
                            "Remove the debug statement or replace it with structured logging",
                        )
                        .with_line(line_number)
                        .with_snippet(truncate(line.trim(), 120)),
                    );
                    break;
                }
            }
        }

        Ok(detections)
    }
}

/// Flags TODO/FIXME/HACK markers so they don't silently accumulate.
pub struct TodoMarkerRule;

const TODO_MARKERS: &[&str] = &["TODO", "FIXME", "HACK", "XXX"];

#[async_trait::async_trait]
impl Rule for TodoMarkerRule {
    fn id(&self) -> &str {
        "maintainability/todo-marker"
    }

    fn name(&self) -> &str {
        "Unresolved work marker"
    }

    fn category(&self) -> Category {
        Category::Maintainability
    }

    fn severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn description(&self) -> &str {
        "Flags TODO, FIXME, HACK and XXX markers in source files"
    }

    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError> {
        let mut detections = Vec::new();

        for (line_number, line) in ctx.numbered_lines() {
            if let Some(marker) = TODO_MARKERS.iter().find(|m| line.contains(**m)) {
                detections.push(
                    Detection::new(
                        format!("{marker} marker found"),
                        "Resolve the marker or file a tracked issue for it",
                    )
                    .with_line(line_number)
                    .with_snippet(truncate(line.trim(), 120)),
                );
            }
            if detections.len() >= 5 {
                break;
            }
        }

        Ok(detections)
    }
}

/// Flags files that have grown past a size where they resist review.
pub struct OversizedFileRule;

const MAX_LINES: usize = 1000;

#[async_trait::async_trait]
impl Rule for OversizedFileRule {
    fn id(&self) -> &str {
        "performance/oversized-file"
    }

    fn name(&self) -> &str {
        "Oversized source file"
    }

    fn category(&self) -> Category {
        Category::Performance
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn description(&self) -> &str {
        "Flags source files longer than 1000 lines"
    }

    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError> {
        let lines = ctx.content.lines().count();
        if lines <= MAX_LINES {
            return Ok(vec![]);
        }

        Ok(vec![Detection::new(
            format!("File is {lines} lines long (limit {MAX_LINES})"),
            "Split the file along its natural module boundaries",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectProfile;
    use std::sync::Arc;

    fn context(path: &str, content: &str) -> RuleContext {
        RuleContext::new(
            path,
            content,
            Arc::new(ProjectProfile::default()),
            Arc::new(vec![path.to_string()]),
        )
    }

    #[tokio::test]
    async fn test_debug_logging_in_js() {
        let rule = DebugLoggingRule;
        let ctx = context("src/app.js", "function f() {\n  console.log('x');\n}");

        let detections = rule.check(&ctx).await.unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].line, Some(2));
    }

    #[tokio::test]
    async fn test_debug_logging_ignores_comments() {
        let rule = DebugLoggingRule;
        let ctx = context("src/app.js", "// console.log('x');");

        assert!(rule.check(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_debug_logging_respects_extension() {
        let rule = DebugLoggingRule;
        // dbg! is a Rust marker; console.log should not fire for .rs files.
        let ctx = context("src/main.rs", "let x = dbg!(compute());");
        assert_eq!(rule.check(&ctx).await.unwrap().len(), 1);

        let ctx = context("notes.txt", "console.log('x')");
        assert!(rule.check(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_todo_marker_cap() {
        let rule = TodoMarkerRule;
        let body = "// TODO item\n".repeat(12);
        let ctx = context("src/a.rs", &body);

        assert_eq!(rule.check(&ctx).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_oversized_file() {
        let rule = OversizedFileRule;

        let small = context("src/a.rs", &"line\n".repeat(100));
        assert!(rule.check(&small).await.unwrap().is_empty());

        let big = context("src/b.rs", &"line\n".repeat(1001));
        let detections = rule.check(&big).await.unwrap();
        assert_eq!(detections.len(), 1);
        assert!(detections[0].explanation.contains("1001"));
    }
}
