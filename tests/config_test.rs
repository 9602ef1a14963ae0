//! Layered configuration tests that exercise the global-layer resolution
//! through the environment variable override.

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use codewarden::config::loader::{
    self, GLOBAL_CONFIG_DIR_ENV, GLOBAL_CONFIG_FILENAME, PROJECT_CONFIG_FILENAME,
};
use codewarden::config::ConfigPatch;
use codewarden::rules::Severity;

struct EnvGuard;

impl EnvGuard {
    fn set(dir: &TempDir) -> Self {
        std::env::set_var(GLOBAL_CONFIG_DIR_ENV, dir.path());
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        std::env::remove_var(GLOBAL_CONFIG_DIR_ENV);
    }
}

#[test]
#[serial]
fn global_layer_is_resolved_through_env_override() {
    let global_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&global_dir);

    fs::write(
        global_dir.path().join(GLOBAL_CONFIG_FILENAME),
        "min_severity = \"medium\"\ndisabled_rules = [\"style/no-debug-logging\"]\n",
    )
    .unwrap();

    let config = loader::load(project_dir.path(), ConfigPatch::default());

    assert_eq!(config.min_severity, Some(Severity::Medium));
    assert_eq!(
        config.disabled_rules,
        vec!["style/no-debug-logging".to_string()]
    );
}

#[test]
#[serial]
fn project_layer_outranks_global_layer() {
    let global_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&global_dir);

    fs::write(
        global_dir.path().join(GLOBAL_CONFIG_FILENAME),
        "min_severity = \"low\"\nmax_concurrency = 4\n",
    )
    .unwrap();
    fs::write(
        project_dir.path().join(PROJECT_CONFIG_FILENAME),
        "min_severity = \"high\"\n",
    )
    .unwrap();

    let config = loader::load(project_dir.path(), ConfigPatch::default());

    // Project overrides the shared scalar; the other global scalar stays.
    assert_eq!(config.min_severity, Some(Severity::High));
    assert_eq!(config.max_concurrency, 4);
}

#[test]
#[serial]
fn caller_overrides_outrank_both_file_layers() {
    let global_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&global_dir);

    fs::write(
        global_dir.path().join(GLOBAL_CONFIG_FILENAME),
        "fail_on_severity = \"low\"\n",
    )
    .unwrap();
    fs::write(
        project_dir.path().join(PROJECT_CONFIG_FILENAME),
        "fail_on_severity = \"medium\"\n",
    )
    .unwrap();

    let config = loader::load(
        project_dir.path(),
        ConfigPatch {
            fail_on_severity: Some(Severity::Critical),
            ..Default::default()
        },
    );

    assert_eq!(config.fail_on_severity, Some(Severity::Critical));
}

#[test]
#[serial]
fn array_fields_replace_wholesale_across_layers() {
    let global_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&global_dir);

    fs::write(
        global_dir.path().join(GLOBAL_CONFIG_FILENAME),
        "disabled_rules = [\"a\", \"b\", \"c\"]\n",
    )
    .unwrap();
    fs::write(
        project_dir.path().join(PROJECT_CONFIG_FILENAME),
        "disabled_rules = [\"d\"]\n",
    )
    .unwrap();

    let config = loader::load(project_dir.path(), ConfigPatch::default());

    // Replaced, never unioned.
    assert_eq!(config.disabled_rules, vec!["d".to_string()]);
}

#[test]
#[serial]
fn invalid_global_layer_is_discarded_but_project_layer_survives() {
    let global_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&global_dir);

    fs::write(
        global_dir.path().join(GLOBAL_CONFIG_FILENAME),
        "min_severity = \"catastrophic\"\nparallel = false\n",
    )
    .unwrap();
    fs::write(
        project_dir.path().join(PROJECT_CONFIG_FILENAME),
        "max_files = 10\n",
    )
    .unwrap();

    let config = loader::load(project_dir.path(), ConfigPatch::default());

    // The invalid global layer is rejected wholesale, including its valid
    // `parallel` field; the project layer still applies.
    assert!(config.parallel);
    assert!(config.min_severity.is_none());
    assert_eq!(config.max_files, Some(10));
}
