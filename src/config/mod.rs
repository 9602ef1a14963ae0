//! Configuration module

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::rules::{Category, Severity};

/// A config-defined pattern rule.
///
/// Compiled into a regular rule at registration time; see
/// [`crate::rules::pattern::PatternRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRuleDef {
    /// Short id, unique among custom rules. Registered as `custom/<id>`.
    pub id: String,

    /// Regex pattern to match.
    pub pattern: String,

    /// Severity of produced violations.
    #[serde(default = "default_custom_severity")]
    pub severity: Severity,

    /// Concern area of the rule.
    #[serde(default = "default_custom_category")]
    pub category: Category,

    /// File glob patterns to include. Empty means every eligible file.
    #[serde(default)]
    pub files: Vec<String>,

    /// Custom explanation for the violation.
    pub message: Option<String>,

    /// Suggested fix.
    pub fix: Option<String>,

    /// If true, report when the pattern is NOT found (inverted matching).
    #[serde(default)]
    pub invert: bool,
}

fn default_custom_severity() -> Severity {
    Severity::Medium
}

fn default_custom_category() -> Category {
    Category::Maintainability
}

/// Fully merged engine configuration.
///
/// Built once per invocation from the four layers (defaults, global file,
/// project file, caller overrides) and never mutated during execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Keep only violations at or above this severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_severity: Option<Severity>,

    /// Fail the run when any violation is at or above this severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on_severity: Option<Severity>,

    /// Evaluate files concurrently.
    pub parallel: bool,

    /// Enable the binary content sniff for files that pass the cheaper
    /// extension and directory checks.
    pub deep_scan: bool,

    /// Evaluate at most this many eligible files (first N in scan order).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,

    /// Bound on in-flight file evaluations when `parallel` is set.
    pub max_concurrency: usize,

    /// Rule ids excluded from execution.
    pub disabled_rules: Vec<String>,

    /// Keep only violations in these categories. Empty disables the filter.
    pub categories: Vec<Category>,

    /// Config-defined pattern rules.
    pub custom_rules: Vec<CustomRuleDef>,
}

/// Default bound on in-flight file evaluations.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_severity: None,
            fail_on_severity: None,
            parallel: true,
            deep_scan: false,
            max_files: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            disabled_rules: Vec::new(),
            categories: Vec::new(),
            custom_rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Apply one higher-precedence layer. Scalars overwrite; array fields
    /// replace wholesale when the layer defines them, never union.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(v) = patch.min_severity {
            self.min_severity = Some(v);
        }
        if let Some(v) = patch.fail_on_severity {
            self.fail_on_severity = Some(v);
        }
        if let Some(v) = patch.parallel {
            self.parallel = v;
        }
        if let Some(v) = patch.deep_scan {
            self.deep_scan = v;
        }
        if let Some(v) = patch.max_files {
            self.max_files = Some(v);
        }
        if let Some(v) = patch.max_concurrency {
            self.max_concurrency = v;
        }
        if let Some(v) = patch.disabled_rules {
            self.disabled_rules = v;
        }
        if let Some(v) = patch.categories {
            self.categories = v;
        }
        if let Some(v) = patch.custom_rules {
            self.custom_rules = v;
        }
    }
}

/// One configuration layer: every field optional, absent fields leave the
/// lower layers untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub min_severity: Option<Severity>,
    pub fail_on_severity: Option<Severity>,
    pub parallel: Option<bool>,
    pub deep_scan: Option<bool>,
    pub max_files: Option<usize>,
    pub max_concurrency: Option<usize>,
    pub disabled_rules: Option<Vec<String>>,
    pub categories: Option<Vec<Category>>,
    pub custom_rules: Option<Vec<CustomRuleDef>>,
}

impl ConfigPatch {
    /// True when the patch defines nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.parallel);
        assert!(!config.deep_scan);
        assert_eq!(config.max_concurrency, 10);
        assert!(config.min_severity.is_none());
        assert!(config.disabled_rules.is_empty());
    }

    #[test]
    fn test_apply_overwrites_scalars() {
        let mut config = EngineConfig::default();
        config.apply(ConfigPatch {
            min_severity: Some(Severity::High),
            parallel: Some(false),
            max_files: Some(50),
            ..Default::default()
        });

        assert_eq!(config.min_severity, Some(Severity::High));
        assert!(!config.parallel);
        assert_eq!(config.max_files, Some(50));
        // Untouched fields keep their previous values.
        assert_eq!(config.max_concurrency, 10);
    }

    #[test]
    fn test_apply_replaces_arrays_wholesale() {
        let mut config = EngineConfig::default();
        config.disabled_rules = vec!["a".to_string(), "b".to_string()];

        config.apply(ConfigPatch {
            disabled_rules: Some(vec!["c".to_string()]),
            ..Default::default()
        });

        // Replaced, never unioned.
        assert_eq!(config.disabled_rules, vec!["c".to_string()]);
    }

    #[test]
    fn test_apply_absent_array_keeps_lower_layer() {
        let mut config = EngineConfig::default();
        config.disabled_rules = vec!["a".to_string()];

        config.apply(ConfigPatch::default());

        assert_eq!(config.disabled_rules, vec!["a".to_string()]);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = EngineConfig::default();
        config.min_severity = Some(Severity::Medium);
        config.disabled_rules = vec!["style/no-debug-logging".to_string()];
        config.custom_rules = vec![CustomRuleDef {
            id: "no-todo".to_string(),
            pattern: "TODO".to_string(),
            severity: Severity::Suggestion,
            category: Category::Maintainability,
            files: vec!["**/*.rs".to_string()],
            message: None,
            fix: None,
            invert: false,
        }];

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed, config);
    }
}
