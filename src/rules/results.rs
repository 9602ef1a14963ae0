//! # Audit Result Structures
//!
//! This module defines the data structures for representing rule violations
//! and aggregated audit results.
//!
//! ## Overview
//!
//! - [`Severity`] - Ranked violation severity (Critical down to Suggestion)
//! - [`Category`] - Closed classification of a rule's concern area
//! - [`Violation`] - Individual normalized finding with location and fix
//! - [`AuditResult`] - Aggregated outcome of one engine run
//!
//! ## Examples
//!
//! ```rust
//! use codewarden::rules::results::{AuditResult, Severity, Violation};
//!
//! let violations = vec![Violation::example("SEC001", Severity::Critical)];
//! let result = AuditResult::from_violations(violations, 120, 10, 4);
//!
//! assert_eq!(result.summary.total, 1);
//! assert!(result.violations[0].immediate_attention);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity levels for violations, ranked from most to least urgent.
///
/// The declaration order is the rank order: `Critical` outranks `High`,
/// which outranks `Medium`, and so on down to `Suggestion`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be resolved immediately. Examples: exposed secrets.
    Critical,
    /// Serious issues that should block a release.
    High,
    /// Issues worth fixing in the near term.
    Medium,
    /// Minor issues with low impact.
    Low,
    /// Optional improvements and best-practice hints.
    Suggestion,
}

impl Severity {
    /// All severities in rank order, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Suggestion,
    ];

    /// Numeric rank where 0 is the most severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Suggestion => 4,
        }
    }

    /// True if this severity is at or above the given threshold.
    pub fn at_least(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }

    /// Parse a severity from a user-supplied string.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "suggestion" => Some(Self::Suggestion),
            _ => None,
        }
    }

    /// Uppercase label used in report headings.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Suggestion => "SUGGESTION",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Suggestion => "suggestion",
        })
    }
}

/// Closed classification of a rule's concern area.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Vulnerabilities, exposed credentials, unsafe constructs.
    Security,
    /// Test presence and coverage heuristics.
    Testing,
    /// Module layout and dependency direction.
    Architecture,
    /// Inefficient constructs and oversized inputs.
    Performance,
    /// Formatting and readability conventions.
    Style,
    /// Long-term code health markers.
    Maintainability,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Security,
        Category::Testing,
        Category::Architecture,
        Category::Performance,
        Category::Style,
        Category::Maintainability,
    ];

    /// Parse a category from a user-supplied string.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "security" => Some(Self::Security),
            "testing" => Some(Self::Testing),
            "architecture" => Some(Self::Architecture),
            "performance" => Some(Self::Performance),
            "style" => Some(Self::Style),
            "maintainability" => Some(Self::Maintainability),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::Security => "security",
            Category::Testing => "testing",
            Category::Architecture => "architecture",
            Category::Performance => "performance",
            Category::Style => "style",
            Category::Maintainability => "maintainability",
        })
    }
}

/// A single normalized violation produced by evaluating a rule against a file.
///
/// Identity fields (`rule_id`, `rule_name`, `category`, `severity`) are
/// denormalized copies taken from the rule at evaluation time, so a violation
/// stays self-describing even if the rule is later unregistered.
/// `immediate_attention` always equals `severity == Critical`; the engine
/// recomputes it during normalization and never trusts raw rule output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Id of the rule that produced this violation.
    pub rule_id: String,

    /// Human-readable name of the rule.
    pub rule_name: String,

    /// Category copied from the rule.
    pub category: Category,

    /// Final severity after normalization.
    pub severity: Severity,

    /// Repository-relative path of the offending file.
    pub file_path: String,

    /// 1-based line number, when the rule could locate the issue.
    pub line: Option<u32>,

    /// 1-based column number.
    pub column: Option<u32>,

    /// Short code excerpt around the issue.
    pub snippet: Option<String>,

    /// Actionable guidance for resolving the issue.
    pub fix_suggestion: String,

    /// Why this is a problem.
    pub explanation: String,

    /// Always `severity == Critical` after normalization.
    pub immediate_attention: bool,
}

impl Violation {
    /// Construct a minimal violation for examples and tests.
    pub fn example(rule_id: impl Into<String>, severity: Severity) -> Self {
        let rule_id = rule_id.into();
        Self {
            rule_name: format!("{} rule", rule_id),
            rule_id,
            category: Category::Maintainability,
            severity,
            file_path: "src/lib.rs".to_string(),
            line: None,
            column: None,
            snippet: None,
            fix_suggestion: "Fix the reported issue".to_string(),
            explanation: "Example violation".to_string(),
            immediate_attention: severity == Severity::Critical,
        }
    }
}

/// Aggregate counts recomputed from a violation list.
///
/// The counts always describe exactly the violations they were computed
/// from; every severity and category appears with an explicit count so the
/// output shape is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Total number of violations.
    pub total: usize,

    /// Violation count per severity.
    pub by_severity: BTreeMap<Severity, usize>,

    /// Violation count per category.
    pub by_category: BTreeMap<Category, usize>,
}

impl AuditSummary {
    /// Compute a summary strictly from the given violations.
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();

        for violation in violations {
            *by_severity.entry(violation.severity).or_insert(0) += 1;
            *by_category.entry(violation.category).or_insert(0) += 1;
        }

        Self {
            total: violations.len(),
            by_severity,
            by_category,
        }
    }

    /// Count for one severity.
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Count for one category.
    pub fn category_count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Outcome of one engine run.
///
/// The violation list has already been through severity and category
/// post-filtering; the summary is recomputed from the filtered list, so the
/// two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    /// Filtered violations, in file scan order.
    pub violations: Vec<Violation>,

    /// Counts derived from `violations`.
    pub summary: AuditSummary,

    /// Wall-clock duration of the run in milliseconds.
    pub execution_time_ms: u64,

    /// Number of eligible files whose content was actually read.
    pub files_scanned: usize,

    /// Number of rules that ran against each scanned file.
    pub rules_executed: usize,

    /// When the result was produced.
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl AuditResult {
    /// Build a result from an already-filtered violation list.
    pub fn from_violations(
        violations: Vec<Violation>,
        execution_time_ms: u64,
        files_scanned: usize,
        rules_executed: usize,
    ) -> Self {
        let summary = AuditSummary::from_violations(&violations);
        Self {
            violations,
            summary,
            execution_time_ms,
            files_scanned,
            rules_executed,
            generated_at: chrono::Utc::now(),
        }
    }

    /// True when no violations survived filtering.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Reduced form for embedding into larger reports.
    pub fn compact(&self) -> CompactResult {
        CompactResult {
            total: self.summary.total,
            by_severity: self.summary.by_severity.clone(),
            files_scanned: self.files_scanned,
            rules_executed: self.rules_executed,
            execution_time_ms: self.execution_time_ms,
        }
    }
}

/// Reduced result shape for embedding elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactResult {
    /// Total violations after filtering.
    pub total: usize,
    /// Per-severity counts.
    pub by_severity: BTreeMap<Severity, usize>,
    /// Files actually read.
    pub files_scanned: usize,
    /// Rules that ran.
    pub rules_executed: usize,
    /// Run duration in milliseconds.
    pub execution_time_ms: u64,
}

/// Group violations by severity. Only severities with at least one
/// violation appear; map order is rank order.
pub fn group_by_severity(violations: &[Violation]) -> BTreeMap<Severity, Vec<&Violation>> {
    let mut groups: BTreeMap<Severity, Vec<&Violation>> = BTreeMap::new();
    for violation in violations {
        groups.entry(violation.severity).or_default().push(violation);
    }
    groups
}

/// Group violations by category.
pub fn group_by_category(violations: &[Violation]) -> BTreeMap<Category, Vec<&Violation>> {
    let mut groups: BTreeMap<Category, Vec<&Violation>> = BTreeMap::new();
    for violation in violations {
        groups.entry(violation.category).or_default().push(violation);
    }
    groups
}

/// Group violations by file path.
pub fn group_by_file(violations: &[Violation]) -> BTreeMap<String, Vec<&Violation>> {
    let mut groups: BTreeMap<String, Vec<&Violation>> = BTreeMap::new();
    for violation in violations {
        groups
            .entry(violation.file_path.clone())
            .or_default()
            .push(violation);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Critical.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
        assert!(Severity::Low.rank() < Severity::Suggestion.rank());
    }

    #[test]
    fn test_severity_at_least() {
        assert!(Severity::Critical.at_least(Severity::High));
        assert!(Severity::High.at_least(Severity::High));
        assert!(!Severity::Medium.at_least(Severity::High));
        assert!(Severity::Suggestion.at_least(Severity::Suggestion));
    }

    #[test]
    fn test_severity_from_string() {
        assert_eq!(Severity::from_string("critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_string("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::from_string("high"), Some(Severity::High));
        assert_eq!(Severity::from_string("medium"), Some(Severity::Medium));
        assert_eq!(Severity::from_string("low"), Some(Severity::Low));
        assert_eq!(
            Severity::from_string("suggestion"),
            Some(Severity::Suggestion)
        );
        assert_eq!(Severity::from_string("warning"), None);
        assert_eq!(Severity::from_string(""), None);
    }

    #[test]
    fn test_category_from_string() {
        assert_eq!(Category::from_string("security"), Some(Category::Security));
        assert_eq!(Category::from_string("Testing"), Some(Category::Testing));
        assert_eq!(
            Category::from_string("maintainability"),
            Some(Category::Maintainability)
        );
        assert_eq!(Category::from_string("unknown"), None);
    }

    #[test]
    fn test_summary_matches_violations() {
        let violations = vec![
            Violation::example("A", Severity::Critical),
            Violation::example("B", Severity::Critical),
            Violation::example("C", Severity::Medium),
        ];

        let summary = AuditSummary::from_violations(&violations);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.severity_count(Severity::Critical), 2);
        assert_eq!(summary.severity_count(Severity::Medium), 1);
        assert_eq!(summary.severity_count(Severity::High), 0);
        assert_eq!(summary.category_count(Category::Maintainability), 3);
        assert_eq!(summary.category_count(Category::Security), 0);
    }

    #[test]
    fn test_summary_empty() {
        let summary = AuditSummary::from_violations(&[]);
        assert_eq!(summary.total, 0);
        for severity in Severity::ALL {
            assert_eq!(summary.severity_count(severity), 0);
        }
    }

    #[test]
    fn test_result_roundtrip() {
        let result = AuditResult::from_violations(
            vec![Violation::example("SEC001", Severity::High)],
            42,
            5,
            3,
        );

        let serialized = serde_json::to_string(&result).unwrap();
        let parsed: AuditResult = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed.violations, result.violations);
        assert_eq!(parsed.summary, result.summary);
        assert_eq!(parsed.files_scanned, 5);
        assert_eq!(parsed.rules_executed, 3);
    }

    #[test]
    fn test_compact_result() {
        let result = AuditResult::from_violations(
            vec![Violation::example("A", Severity::Low)],
            10,
            2,
            1,
        );
        let compact = result.compact();

        assert_eq!(compact.total, 1);
        assert_eq!(compact.files_scanned, 2);
        assert_eq!(compact.by_severity[&Severity::Low], 1);
    }

    #[test]
    fn test_group_by_severity_rank_order() {
        let violations = vec![
            Violation::example("low", Severity::Low),
            Violation::example("crit", Severity::Critical),
            Violation::example("crit2", Severity::Critical),
        ];

        let groups = group_by_severity(&violations);
        let keys: Vec<_> = groups.keys().copied().collect();

        assert_eq!(keys, vec![Severity::Critical, Severity::Low]);
        assert_eq!(groups[&Severity::Critical].len(), 2);
    }

    #[test]
    fn test_group_by_file() {
        let mut a = Violation::example("A", Severity::Medium);
        a.file_path = "src/a.rs".to_string();
        let mut b = Violation::example("B", Severity::Medium);
        b.file_path = "src/b.rs".to_string();
        let mut c = Violation::example("C", Severity::Low);
        c.file_path = "src/a.rs".to_string();

        let violations = vec![a, b, c];
        let groups = group_by_file(&violations);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["src/a.rs"].len(), 2);
        assert_eq!(groups["src/b.rs"].len(), 1);
    }
}
