//! Terminal output formatting with colors

use colored::Colorize;

use super::ReportRenderer;
use crate::error::CodewardenError;
use crate::rules::results::{group_by_severity, AuditResult, Severity, Violation};

/// Human-oriented renderer: violations grouped by severity in rank order,
/// followed by a summary footer.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn severity_heading(&self, severity: Severity, count: usize) -> String {
        let label = format!("{} ({})", severity.label(), count);
        let colored = match severity {
            Severity::Critical => label.red().bold(),
            Severity::High => label.red(),
            Severity::Medium => label.yellow().bold(),
            Severity::Low => label.yellow(),
            Severity::Suggestion => label.blue(),
        };
        format!("{colored}\n")
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let location = match violation.line {
            Some(line) => format!("{}:{}", violation.file_path, line),
            None => violation.file_path.clone(),
        };

        let mut output = format!(
            "  {} [{}] {}\n    {} {}\n",
            "•".dimmed(),
            violation.rule_id.cyan(),
            violation.explanation,
            "└─".dimmed(),
            location.dimmed(),
        );

        if let Some(snippet) = &violation.snippet {
            output.push_str(&format!("       {}\n", snippet.dimmed()));
        }

        output.push_str(&format!(
            "       {} {}\n",
            "fix:".green(),
            violation.fix_suggestion
        ));

        output
    }

    fn format_summary(&self, result: &AuditResult) -> String {
        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  SUMMARY".bold()
        );

        let counts: Vec<String> = Severity::ALL
            .iter()
            .map(|severity| {
                format!(
                    "{}: {}",
                    severity.label(),
                    result.summary.severity_count(*severity)
                )
            })
            .collect();
        output.push_str(&format!("{}\n", counts.join(" │ ")));

        output.push_str(&format!(
            "Scanned {} files with {} rules in {}\n",
            result.files_scanned,
            result.rules_executed,
            format_duration_ms(result.execution_time_ms)
        ));

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render(&self, result: &AuditResult) -> Result<String, CodewardenError> {
        let mut output = format!(
            "\n{} v{}\n",
            "codewarden".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );

        if result.is_clean() {
            output.push_str(&format!("\n{}\n", "No violations found.".green().bold()));
            output.push_str(&self.format_summary(result));
            return Ok(output);
        }

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  VIOLATIONS".bold()
        ));

        let groups = group_by_severity(&result.violations);
        for severity in Severity::ALL {
            let Some(violations) = groups.get(&severity) else {
                continue;
            };
            output.push_str(&self.severity_heading(severity, violations.len()));
            for violation in violations {
                output.push_str(&self.format_violation(violation));
            }
            output.push('\n');
        }

        output.push_str(&self.format_summary(result));
        Ok(output)
    }
}

/// Format a millisecond duration for the footer.
fn format_duration_ms(millis: u64) -> String {
    if millis == 0 {
        "< 1ms".to_string()
    } else if millis >= 1000 {
        format!("{:.2}s", millis as f64 / 1000.0)
    } else {
        format!("{millis}ms")
    }
}
