//! Rule execution engine
//!
//! Orchestrates one audit run: rule selection, eligible-file resolution,
//! per-file evaluation (sequential or bounded-concurrent), severity
//! normalization, post-filtering and aggregation. Serial and parallel
//! execution produce identical results; parallelism is a performance knob,
//! never a correctness knob.

pub mod concurrency;
pub mod filter;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::profile::ProjectProfile;
use crate::rules::results::{AuditResult, Category, Severity, Violation};
use crate::rules::{Detection, Rule, RuleContext, RuleRegistry};
use crate::scanner::FileTree;

/// Outcome of evaluating one file.
#[derive(Default)]
struct FileEvaluation {
    /// The file's content was actually read.
    scanned: bool,
    /// Normalized violations from every rule that ran against the file.
    violations: Vec<Violation>,
}

/// Main rule execution engine.
///
/// Owns a registry snapshot and an immutable configuration for the
/// duration of a run. The registry is read-only during `execute`; the
/// returned result is exclusively owned by the caller.
pub struct RuleEngine {
    registry: RuleRegistry,
    config: EngineConfig,
}

impl RuleEngine {
    /// Create an engine over a registry and a merged configuration.
    pub fn new(registry: RuleRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every applicable rule against every eligible file.
    pub async fn execute(&self, tree: &FileTree, profile: &ProjectProfile) -> AuditResult {
        let rules = self.select_rules(profile);
        self.run_pipeline(rules, tree, profile).await
    }

    /// Run the same pipeline restricted to an explicit rule id subset,
    /// bypassing framework filtering. Unknown ids produce a warning, not a
    /// failure.
    pub async fn execute_rules(
        &self,
        ids: &[String],
        tree: &FileTree,
        profile: &ProjectProfile,
    ) -> AuditResult {
        let mut rules = Vec::new();
        for id in ids {
            match self.registry.get(id) {
                Some(rule) => rules.push(rule),
                None => warn!(rule_id = %id, "requested rule is not registered"),
            }
        }
        self.run_pipeline(rules, tree, profile).await
    }

    /// True iff `fail_on_severity` is configured and at least one violation
    /// is at or above that threshold. The caller maps this to the process
    /// exit status.
    pub fn should_fail(&self, result: &AuditResult) -> bool {
        match self.config.fail_on_severity {
            Some(threshold) => result
                .violations
                .iter()
                .any(|v| v.severity.at_least(threshold)),
            None => false,
        }
    }

    /// Registered rules minus disabled ids, narrowed to the project's
    /// frameworks.
    fn select_rules(&self, profile: &ProjectProfile) -> Vec<Arc<dyn Rule>> {
        for id in &self.config.disabled_rules {
            if !self.registry.has(id) {
                warn!(rule_id = %id, "disabled rule is not registered, ignoring");
            }
        }

        self.registry
            .all()
            .into_iter()
            .filter(|rule| !self.config.disabled_rules.iter().any(|id| id == rule.id()))
            .filter(|rule| applies_to_profile(rule.as_ref(), profile))
            .collect()
    }

    /// Eligible files in scan order, capped at `max_files`.
    fn eligible_files(&self, tree: &FileTree) -> Vec<String> {
        let mut files: Vec<String> = tree
            .file_paths()
            .into_iter()
            .filter(|path| !filter::should_exclude(&tree.root, path, self.config.deep_scan))
            .collect();

        if let Some(max) = self.config.max_files {
            files.truncate(max);
        }

        files
    }

    /// Steps 3-7 of the pipeline, shared by `execute` and `execute_rules`.
    async fn run_pipeline(
        &self,
        rules: Vec<Arc<dyn Rule>>,
        tree: &FileTree,
        profile: &ProjectProfile,
    ) -> AuditResult {
        let started = Instant::now();

        let files = self.eligible_files(tree);
        let rules_executed = rules.len();

        debug!(
            rules = rules_executed,
            files = files.len(),
            parallel = self.config.parallel,
            "starting audit run"
        );

        let root = Arc::new(tree.root.clone());
        let rules = Arc::new(rules);
        let profile = Arc::new(profile.clone());
        let all_files = Arc::new(tree.file_paths());

        let evaluations: Vec<FileEvaluation> = if self.config.parallel {
            let op_root = Arc::clone(&root);
            let op_rules = Arc::clone(&rules);
            let op_profile = Arc::clone(&profile);
            let op_all_files = Arc::clone(&all_files);

            concurrency::process_in_parallel(
                files,
                self.config.max_concurrency,
                move |path: String| {
                    let root = Arc::clone(&op_root);
                    let rules = Arc::clone(&op_rules);
                    let profile = Arc::clone(&op_profile);
                    let all_files = Arc::clone(&op_all_files);
                    async move { evaluate_file(root, path, rules, profile, all_files).await }
                },
            )
            .await
            .into_iter()
            .map(|slot| slot.unwrap_or_default())
            .collect()
        } else {
            let mut evaluations = Vec::with_capacity(files.len());
            for path in files {
                evaluations.push(
                    evaluate_file(
                        Arc::clone(&root),
                        path,
                        Arc::clone(&rules),
                        Arc::clone(&profile),
                        Arc::clone(&all_files),
                    )
                    .await,
                );
            }
            evaluations
        };

        let files_scanned = evaluations.iter().filter(|e| e.scanned).count();
        let violations: Vec<Violation> = evaluations
            .into_iter()
            .flat_map(|e| e.violations)
            .collect();

        let violations = filter_by_min_severity(violations, self.config.min_severity);
        let violations = filter_by_categories(violations, &self.config.categories);

        let result = AuditResult::from_violations(
            violations,
            started.elapsed().as_millis() as u64,
            files_scanned,
            rules_executed,
        );

        info!(
            violations = result.summary.total,
            files_scanned = result.files_scanned,
            rules_executed = result.rules_executed,
            "audit run complete"
        );

        result
    }
}

/// True when the rule applies to the detected project: unrestricted rules
/// apply universally, restricted rules only when the framework sets
/// intersect.
fn applies_to_profile(rule: &dyn Rule, profile: &ProjectProfile) -> bool {
    match rule.frameworks() {
        None => true,
        Some(list) => list.iter().any(|f| profile.uses_framework(f)),
    }
}

/// Read one file and run every rule against it. Unreadable files are
/// silently skipped: not scanned, no violations. A rule returning `Err` is
/// contained and contributes zero violations for this file.
async fn evaluate_file(
    root: Arc<PathBuf>,
    path: String,
    rules: Arc<Vec<Arc<dyn Rule>>>,
    profile: Arc<ProjectProfile>,
    all_files: Arc<Vec<String>>,
) -> FileEvaluation {
    let content = match tokio::fs::read_to_string(root.join(&path)).await {
        Ok(content) => content,
        Err(error) => {
            debug!(file = %path, %error, "skipping unreadable file");
            return FileEvaluation::default();
        }
    };

    let ctx = RuleContext::new(path.clone(), content, profile, all_files);
    let mut violations = Vec::new();

    for rule in rules.iter() {
        match rule.check(&ctx).await {
            Ok(detections) => {
                for detection in detections {
                    violations.push(normalize_detection(rule.as_ref(), &ctx, detection));
                }
            }
            Err(error) => {
                warn!(rule_id = %rule.id(), file = %path, %error, "rule check failed");
            }
        }
    }

    FileEvaluation {
        scanned: true,
        violations,
    }
}

/// Turn raw rule output into a normalized violation.
///
/// Severity resolution: the rule's severity-adjustment hook outranks a
/// per-detection override, which outranks the rule's declared severity.
/// `immediate_attention` is always recomputed from the final severity.
fn normalize_detection(rule: &dyn Rule, ctx: &RuleContext, detection: Detection) -> Violation {
    let severity = rule
        .adjusted_severity(ctx)
        .or(detection.severity)
        .unwrap_or_else(|| rule.severity());

    Violation {
        rule_id: rule.id().to_string(),
        rule_name: rule.name().to_string(),
        category: rule.category(),
        severity,
        file_path: ctx.file_path.clone(),
        line: detection.line,
        column: detection.column,
        snippet: detection.snippet,
        fix_suggestion: detection.fix_suggestion,
        explanation: detection.explanation,
        immediate_attention: severity == Severity::Critical,
    }
}

/// Keep violations ranked at or above the configured minimum. `None`
/// disables the filter.
pub fn filter_by_min_severity(
    violations: Vec<Violation>,
    min_severity: Option<Severity>,
) -> Vec<Violation> {
    match min_severity {
        Some(threshold) => violations
            .into_iter()
            .filter(|v| v.severity.at_least(threshold))
            .collect(),
        None => violations,
    }
}

/// Keep violations whose category is in the allow-list. An empty list
/// disables the filter.
pub fn filter_by_categories(violations: Vec<Violation>, categories: &[Category]) -> Vec<Violation> {
    if categories.is_empty() {
        return violations;
    }
    violations
        .into_iter()
        .filter(|v| categories.contains(&v.category))
        .collect()
}
