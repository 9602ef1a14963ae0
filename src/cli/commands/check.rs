//! `check` command - run an audit and report violations

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use tracing::info;

use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::cli::{parse_category, parse_severity};
use crate::config::{loader, ConfigPatch};
use crate::engine::RuleEngine;
use crate::error::CodewardenError;
use crate::exit_codes;
use crate::rules::builtin::builtin_rules;
use crate::rules::pattern::PatternRule;
use crate::rules::{Category, RuleRegistry, Severity};
use crate::{profile, scanner};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-oriented report.
    Text,
    /// Machine-parseable JSON.
    Json,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Directory to audit
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Keep only violations at or above this severity
    #[arg(long, value_parser = parse_severity, value_name = "SEVERITY")]
    pub min_severity: Option<Severity>,

    /// Exit non-zero when any violation is at or above this severity
    #[arg(long, value_parser = parse_severity, value_name = "SEVERITY")]
    pub fail_on_severity: Option<Severity>,

    /// Disable a rule by id (repeatable)
    #[arg(long = "disable-rule", value_name = "RULE_ID")]
    pub disable_rule: Vec<String>,

    /// Keep only violations in this category (repeatable)
    #[arg(long = "category", value_parser = parse_category, value_name = "CATEGORY")]
    pub category: Vec<Category>,

    /// Run only these rule ids (repeatable), bypassing framework filtering
    #[arg(long = "rule", value_name = "RULE_ID")]
    pub rule: Vec<String>,

    /// Content-sniff files for binary data before evaluation
    #[arg(long)]
    pub deep: bool,

    /// Evaluate files one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Bound on in-flight file evaluations
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Evaluate at most N eligible files
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CheckArgs {
    /// Map the flags onto a caller-override configuration layer. Flags the
    /// user did not pass leave the file layers untouched.
    fn overrides(&self) -> ConfigPatch {
        ConfigPatch {
            min_severity: self.min_severity,
            fail_on_severity: self.fail_on_severity,
            parallel: self.sequential.then_some(false),
            deep_scan: self.deep.then_some(true),
            max_files: self.max_files,
            max_concurrency: self.max_concurrency,
            disabled_rules: (!self.disable_rule.is_empty()).then(|| self.disable_rule.clone()),
            categories: (!self.category.is_empty()).then(|| self.category.clone()),
            custom_rules: None,
        }
    }
}

pub async fn execute(args: CheckArgs) -> Result<i32, CodewardenError> {
    let tree = scanner::scan(&args.path);
    let detected = profile::detect(&tree);

    info!(
        project_type = %detected.project_type,
        frameworks = ?detected.frameworks,
        files = tree.file_count,
        "scanned project"
    );

    let config = loader::load(&args.path, args.overrides());

    let mut registry = RuleRegistry::new();
    registry.register_many(builtin_rules())?;
    for rule in PatternRule::compile_all(&config.custom_rules) {
        registry.register(Arc::new(rule))?;
    }

    let engine = RuleEngine::new(registry, config);
    let result = if args.rule.is_empty() {
        engine.execute(&tree, &detected).await
    } else {
        engine.execute_rules(&args.rule, &tree, &detected).await
    };

    let rendered = match args.format {
        OutputFormat::Text => TerminalOutput::new().render(&result)?,
        OutputFormat::Json => JsonOutput::new().render(&result)?,
    };
    println!("{rendered}");

    Ok(if engine.should_fail(&result) {
        exit_codes::POLICY_FAILURE
    } else {
        exit_codes::SUCCESS
    })
}
