//! Output rendering for audit results

pub mod json;
pub mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::error::CodewardenError;
use crate::rules::results::AuditResult;

/// Renders a finished audit result without mutating it.
pub trait ReportRenderer {
    /// Produce the rendered report.
    fn render(&self, result: &AuditResult) -> Result<String, CodewardenError>;
}
