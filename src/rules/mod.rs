//! Rules module - rule contract, registry and builtin catalog

pub mod builtin;
pub mod context;
pub mod pattern;
pub mod registry;
pub mod results;

pub use context::RuleContext;
pub use registry::RuleRegistry;
pub use results::{Category, Severity, Violation};

use crate::error::CodewardenError;

/// Raw output of one rule check, before engine normalization.
///
/// A detection carries only what the rule itself knows: where the issue is
/// and how to fix it. Identity fields (rule id, name, category) and the
/// `immediate_attention` flag are filled in by the engine, which also
/// resolves the final severity. A detection-level severity acts as a
/// per-finding override of the rule's declared severity; a rule-level
/// severity-adjustment hook outranks both.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Why this is a problem.
    pub explanation: String,

    /// Actionable guidance for resolving the issue.
    pub fix_suggestion: String,

    /// 1-based line number.
    pub line: Option<u32>,

    /// 1-based column number.
    pub column: Option<u32>,

    /// Short code excerpt around the issue.
    pub snippet: Option<String>,

    /// Optional per-finding severity override.
    pub severity: Option<Severity>,
}

impl Detection {
    /// Create a new detection
    pub fn new(explanation: impl Into<String>, fix_suggestion: impl Into<String>) -> Self {
        Self {
            explanation: explanation.into(),
            fix_suggestion: fix_suggestion.into(),
            line: None,
            column: None,
            snippet: None,
            severity: None,
        }
    }

    /// Set the line number
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the column number
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Set the code snippet
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Override the severity for this single finding
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// Contract implemented by every rule.
///
/// Category and severity are closed enums, so a rule cannot declare an
/// invalid classification. Checks may be asynchronous and must tolerate any
/// file content; a check that returns `Err` is contained by the engine and
/// contributes zero violations for that file.
#[async_trait::async_trait]
pub trait Rule: Send + Sync {
    /// Globally unique, non-empty rule id (e.g. "secrets/hardcoded-key").
    fn id(&self) -> &str;

    /// Human-readable rule name.
    fn name(&self) -> &str;

    /// Concern area of this rule.
    fn category(&self) -> Category;

    /// Default severity for violations of this rule.
    fn severity(&self) -> Severity;

    /// What the rule looks for.
    fn description(&self) -> &str;

    /// Optional framework allow-list. `None` means the rule applies to
    /// every project; otherwise it applies only when the detected framework
    /// set intersects this list.
    fn frameworks(&self) -> Option<&[String]> {
        None
    }

    /// Free-form labels for grouping rules in listings.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Evaluate the rule against one file.
    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError>;

    /// Optional severity-adjustment hook. When this returns `Some`, every
    /// violation produced by this rule for the given context takes that
    /// severity, replacing both the declared severity and any per-detection
    /// override.
    fn adjusted_severity(&self, _ctx: &RuleContext) -> Option<Severity> {
        None
    }
}
