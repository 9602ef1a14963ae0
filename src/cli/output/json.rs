//! JSON output formatting

use super::ReportRenderer;
use crate::error::CodewardenError;
use crate::rules::results::AuditResult;

/// Machine-parseable renderer. The output deserializes back into an
/// [`AuditResult`] unchanged.
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for JsonOutput {
    fn render(&self, result: &AuditResult) -> Result<String, CodewardenError> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::results::{Severity, Violation};

    fn sample_result() -> AuditResult {
        AuditResult::from_violations(
            vec![
                Violation::example("security/hardcoded-secret", Severity::Critical),
                Violation::example("style/no-debug-logging", Severity::Low),
            ],
            35,
            12,
            6,
        )
    }

    #[test]
    fn test_render_roundtrips() {
        let result = sample_result();
        let rendered = JsonOutput::new().render(&result).unwrap();

        let parsed: AuditResult = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed.violations, result.violations);
        assert_eq!(parsed.summary, result.summary);
        assert_eq!(parsed.files_scanned, result.files_scanned);
        assert_eq!(parsed.rules_executed, result.rules_executed);
        assert_eq!(parsed.execution_time_ms, result.execution_time_ms);
    }

    #[test]
    fn test_render_shape() {
        let rendered = JsonOutput::new().render(&sample_result()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["by_severity"]["critical"], 1);
        assert_eq!(json["files_scanned"], 12);
        assert!(json["violations"].as_array().unwrap().len() == 2);
        assert_eq!(json["violations"][0]["immediate_attention"], true);
    }

    #[test]
    fn test_render_empty_result() {
        let result = AuditResult::from_violations(vec![], 1, 0, 0);
        let rendered = JsonOutput::new().render(&result).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["summary"]["total"], 0);
        assert!(json["violations"].as_array().unwrap().is_empty());
    }
}
