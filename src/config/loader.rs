//! Layered configuration loading
//!
//! Four layers, lowest precedence first: built-in defaults, the global
//! user-level file, the project file, caller overrides. File layers are
//! validated field by field; a layer with any invalid field is discarded
//! wholesale with one diagnostic per failed field, and loading never fails
//! for malformed input. Only `save` can return an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{ConfigPatch, CustomRuleDef, EngineConfig};
use crate::error::{CodewardenError, ConfigError};
use crate::rules::{Category, Severity};

/// Project-level configuration file name.
pub const PROJECT_CONFIG_FILENAME: &str = ".codewarden.toml";

/// File name of the user-level configuration inside the config directory.
pub const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// Environment variable overriding the global configuration directory.
pub const GLOBAL_CONFIG_DIR_ENV: &str = "CODEWARDEN_CONFIG_DIR";

/// Resolve the user-level configuration path.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(GLOBAL_CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join(GLOBAL_CONFIG_FILENAME));
    }
    dirs::config_dir().map(|d| d.join("codewarden").join(GLOBAL_CONFIG_FILENAME))
}

/// Load the merged configuration for a project.
pub fn load(project_root: &Path, overrides: ConfigPatch) -> EngineConfig {
    load_with_global(global_config_path().as_deref(), project_root, overrides)
}

/// Load with an explicit global-layer path (testable entry point).
pub fn load_with_global(
    global: Option<&Path>,
    project_root: &Path,
    overrides: ConfigPatch,
) -> EngineConfig {
    let mut config = EngineConfig::default();

    if let Some(path) = global {
        if let Some(patch) = load_layer(path) {
            config.apply(patch);
        }
    }

    let project_path = project_root.join(PROJECT_CONFIG_FILENAME);
    if let Some(patch) = load_layer(&project_path) {
        config.apply(patch);
    }

    config.apply(overrides);
    config
}

/// Serialize and write a configuration, creating parent directories as
/// needed. I/O failures propagate to the caller.
pub fn save(config: &EngineConfig, path: &Path) -> Result<(), CodewardenError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }

    let content = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    fs::write(path, content).map_err(|source| {
        ConfigError::Write {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

/// Read and validate one file layer. Returns `None` for a missing,
/// unparseable or invalid file; the caller then falls through to the
/// lower layers.
fn load_layer(path: &Path) -> Option<ConfigPatch> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read config, layer discarded");
            return None;
        }
    };

    debug!(path = %path.display(), "loading config layer");
    parse_layer(&content, &path.display().to_string())
}

/// Parse and validate one layer. Every invalid field is logged; a layer
/// with any invalid field is discarded wholesale.
pub fn parse_layer(content: &str, origin: &str) -> Option<ConfigPatch> {
    let value: toml::Value = match toml::from_str(content) {
        Ok(v) => v,
        Err(error) => {
            warn!(config = origin, %error, "invalid TOML, layer discarded");
            return None;
        }
    };

    let Some(table) = value.as_table() else {
        warn!(config = origin, "config root is not a table, layer discarded");
        return None;
    };

    let mut errors: Vec<String> = Vec::new();

    let patch = ConfigPatch {
        min_severity: take_severity(table, "min_severity", &mut errors),
        fail_on_severity: take_severity(table, "fail_on_severity", &mut errors),
        parallel: take_bool(table, "parallel", &mut errors),
        deep_scan: take_bool(table, "deep_scan", &mut errors),
        max_files: take_positive(table, "max_files", &mut errors),
        max_concurrency: take_positive(table, "max_concurrency", &mut errors),
        disabled_rules: take_string_list(table, "disabled_rules", &mut errors),
        categories: take_categories(table, "categories", &mut errors),
        custom_rules: take_custom_rules(table, "custom_rules", &mut errors),
    };

    if !errors.is_empty() {
        for error in &errors {
            warn!(config = origin, field_error = %error, "invalid config field");
        }
        warn!(
            config = origin,
            count = errors.len(),
            "config layer discarded, falling back to defaults"
        );
        return None;
    }

    Some(patch)
}

fn take_severity(
    table: &toml::value::Table,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<Severity> {
    match table.get(key) {
        None => None,
        Some(toml::Value::String(s)) => match Severity::from_string(s) {
            Some(severity) => Some(severity),
            None => {
                errors.push(format!("{key}: unknown severity '{s}'"));
                None
            }
        },
        Some(other) => {
            errors.push(format!("{key}: expected a string, got {}", other.type_str()));
            None
        }
    }
}

fn take_bool(table: &toml::value::Table, key: &str, errors: &mut Vec<String>) -> Option<bool> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Boolean(b)) => Some(*b),
        Some(other) => {
            errors.push(format!(
                "{key}: expected a boolean, got {}",
                other.type_str()
            ));
            None
        }
    }
}

fn take_positive(table: &toml::value::Table, key: &str, errors: &mut Vec<String>) -> Option<usize> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(n)) if *n > 0 => Some(*n as usize),
        Some(toml::Value::Integer(n)) => {
            errors.push(format!("{key}: must be a positive number, got {n}"));
            None
        }
        Some(other) => {
            errors.push(format!("{key}: expected a number, got {}", other.type_str()));
            None
        }
    }
}

fn take_string_list(
    table: &toml::value::Table,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<Vec<String>> {
    let array = match table.get(key) {
        None => return None,
        Some(toml::Value::Array(a)) => a,
        Some(other) => {
            errors.push(format!("{key}: expected a list, got {}", other.type_str()));
            return None;
        }
    };

    let mut items = Vec::with_capacity(array.len());
    for (i, entry) in array.iter().enumerate() {
        match entry.as_str() {
            Some(s) if !s.trim().is_empty() => items.push(s.to_string()),
            Some(_) => errors.push(format!("{key}[{i}]: must be a non-empty string")),
            None => errors.push(format!(
                "{key}[{i}]: expected a string, got {}",
                entry.type_str()
            )),
        }
    }
    Some(items)
}

fn take_categories(
    table: &toml::value::Table,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<Vec<Category>> {
    let names = take_string_list(table, key, errors)?;

    let mut categories = Vec::with_capacity(names.len());
    for name in names {
        match Category::from_string(&name) {
            Some(category) => categories.push(category),
            None => errors.push(format!("{key}: unknown category '{name}'")),
        }
    }
    Some(categories)
}

fn take_custom_rules(
    table: &toml::value::Table,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<Vec<CustomRuleDef>> {
    let array = match table.get(key) {
        None => return None,
        Some(toml::Value::Array(a)) => a,
        Some(other) => {
            errors.push(format!("{key}: expected a list, got {}", other.type_str()));
            return None;
        }
    };

    let mut rules = Vec::with_capacity(array.len());
    for (i, entry) in array.iter().enumerate() {
        let Some(rule_table) = entry.as_table() else {
            errors.push(format!(
                "{key}[{i}]: expected a table, got {}",
                entry.type_str()
            ));
            continue;
        };

        let id = match rule_table.get("id").and_then(|v| v.as_str()) {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => {
                errors.push(format!("{key}[{i}].id: must be a non-empty string"));
                continue;
            }
        };

        let pattern = match rule_table.get("pattern").and_then(|v| v.as_str()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                errors.push(format!("{key}[{i}].pattern: must be a non-empty string"));
                continue;
            }
        };

        let severity = match rule_table.get("severity") {
            None => Severity::Medium,
            Some(toml::Value::String(s)) => match Severity::from_string(s) {
                Some(severity) => severity,
                None => {
                    errors.push(format!("{key}[{i}].severity: unknown severity '{s}'"));
                    continue;
                }
            },
            Some(other) => {
                errors.push(format!(
                    "{key}[{i}].severity: expected a string, got {}",
                    other.type_str()
                ));
                continue;
            }
        };

        let category = match rule_table.get("category") {
            None => Category::Maintainability,
            Some(toml::Value::String(s)) => match Category::from_string(s) {
                Some(category) => category,
                None => {
                    errors.push(format!("{key}[{i}].category: unknown category '{s}'"));
                    continue;
                }
            },
            Some(other) => {
                errors.push(format!(
                    "{key}[{i}].category: expected a string, got {}",
                    other.type_str()
                ));
                continue;
            }
        };

        let files = match rule_table.get("files") {
            None => Vec::new(),
            Some(toml::Value::Array(a)) => a
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect(),
            Some(other) => {
                errors.push(format!(
                    "{key}[{i}].files: expected a list, got {}",
                    other.type_str()
                ));
                continue;
            }
        };

        rules.push(CustomRuleDef {
            id,
            pattern,
            severity,
            category,
            files,
            message: rule_table
                .get("message")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            fix: rule_table
                .get("fix")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            invert: rule_table
                .get("invert")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        });
    }
    Some(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_valid_layer() {
        let patch = parse_layer(
            r#"
min_severity = "medium"
fail_on_severity = "high"
parallel = false
max_files = 200
disabled_rules = ["style/no-debug-logging"]
categories = ["security", "testing"]

[[custom_rules]]
id = "no-todo"
pattern = "TODO"
severity = "suggestion"
files = ["**/*.rs"]
"#,
            "test",
        )
        .unwrap();

        assert_eq!(patch.min_severity, Some(Severity::Medium));
        assert_eq!(patch.fail_on_severity, Some(Severity::High));
        assert_eq!(patch.parallel, Some(false));
        assert_eq!(patch.max_files, Some(200));
        assert_eq!(
            patch.categories,
            Some(vec![Category::Security, Category::Testing])
        );
        let rules = patch.custom_rules.unwrap();
        assert_eq!(rules[0].id, "no-todo");
        assert_eq!(rules[0].severity, Severity::Suggestion);
    }

    #[test]
    fn test_parse_empty_layer() {
        let patch = parse_layer("", "test").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_invalid_severity_discards_layer() {
        // One bad field rejects the whole layer, including valid fields.
        let patch = parse_layer(
            r#"
min_severity = "urgent"
parallel = false
"#,
            "test",
        );
        assert!(patch.is_none());
    }

    #[test]
    fn test_wrong_type_discards_layer() {
        assert!(parse_layer("parallel = \"yes\"", "test").is_none());
        assert!(parse_layer("max_files = -3", "test").is_none());
        assert!(parse_layer("max_files = 0", "test").is_none());
        assert!(parse_layer("disabled_rules = [\"\"]", "test").is_none());
        assert!(parse_layer("disabled_rules = [7]", "test").is_none());
        assert!(parse_layer("categories = [\"nonsense\"]", "test").is_none());
    }

    #[test]
    fn test_unparseable_toml_discards_layer() {
        assert!(parse_layer("this is not toml [", "test").is_none());
    }

    #[test]
    fn test_custom_rule_requires_id_and_pattern() {
        assert!(parse_layer(
            r#"
[[custom_rules]]
pattern = "TODO"
"#,
            "test"
        )
        .is_none());

        assert!(parse_layer(
            r#"
[[custom_rules]]
id = "x"
pattern = ""
"#,
            "test"
        )
        .is_none());
    }

    #[test]
    fn test_layer_precedence() {
        let dir = TempDir::new().unwrap();
        let global_dir = dir.path().join("global");
        let project_dir = dir.path().join("project");
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::create_dir_all(&project_dir).unwrap();

        let global_path = global_dir.join(GLOBAL_CONFIG_FILENAME);
        std::fs::write(
            &global_path,
            "min_severity = \"low\"\ndisabled_rules = [\"a\", \"b\"]\n",
        )
        .unwrap();
        std::fs::write(
            project_dir.join(PROJECT_CONFIG_FILENAME),
            "min_severity = \"high\"\n",
        )
        .unwrap();

        let config = load_with_global(
            Some(global_path.as_path()),
            &project_dir,
            ConfigPatch::default(),
        );

        // Project layer overrides the global scalar; the global array
        // survives because the project layer does not define it.
        assert_eq!(config.min_severity, Some(Severity::High));
        assert_eq!(
            config.disabled_rules,
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_overrides_have_highest_precedence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            "min_severity = \"high\"\ndisabled_rules = [\"x\"]\n",
        )
        .unwrap();

        let config = load_with_global(
            None,
            dir.path(),
            ConfigPatch {
                min_severity: Some(Severity::Critical),
                disabled_rules: Some(vec![]),
                ..Default::default()
            },
        );

        assert_eq!(config.min_severity, Some(Severity::Critical));
        // Caller-defined empty list replaces the project list wholesale.
        assert!(config.disabled_rules.is_empty());
    }

    #[test]
    fn test_invalid_project_layer_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            "min_severity = \"urgent\"\nparallel = false\n",
        )
        .unwrap();

        let config = load_with_global(None, dir.path(), ConfigPatch::default());

        // The whole layer was discarded, defaults survive.
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_with_global(None, dir.path(), ConfigPatch::default());
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/config.toml");

        let mut config = EngineConfig::default();
        config.fail_on_severity = Some(Severity::High);
        save(&config, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed = parse_layer(&written, "saved").unwrap();
        assert_eq!(parsed.fail_on_severity, Some(Severity::High));
    }

    #[test]
    fn test_save_propagates_io_errors() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the write fail.
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();

        let result = save(&EngineConfig::default(), &path);
        assert!(result.is_err());
    }
}
