//! `rules` command - list the registered rule catalog

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use colored::Colorize;

use crate::cli::parse_category;
use crate::config::{loader, ConfigPatch};
use crate::error::CodewardenError;
use crate::exit_codes;
use crate::rules::builtin::builtin_rules;
use crate::rules::pattern::PatternRule;
use crate::rules::results::Severity;
use crate::rules::{Category, RuleRegistry};

#[derive(Args)]
pub struct RulesArgs {
    /// Project directory whose configuration decides disabled rules
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show only rules in this category
    #[arg(long, value_parser = parse_category, value_name = "CATEGORY")]
    pub category: Option<Category>,
}

pub async fn execute(args: RulesArgs) -> Result<i32, CodewardenError> {
    let config = loader::load(&args.path, ConfigPatch::default());

    let mut registry = RuleRegistry::new();
    registry.register_many(builtin_rules())?;
    for rule in PatternRule::compile_all(&config.custom_rules) {
        registry.register(Arc::new(rule))?;
    }

    println!("\n{} registered rules\n", registry.len().to_string().bold());

    for status in registry.all_with_status(&config.disabled_rules) {
        let rule = &status.rule;
        if let Some(category) = args.category {
            if rule.category() != category {
                continue;
            }
        }

        let severity = severity_tag(rule.severity());
        let disabled = if status.disabled {
            " (disabled)".dimmed().to_string()
        } else {
            String::new()
        };

        println!(
            "  {severity} [{}] {}{}\n      {}",
            rule.category().to_string().magenta(),
            rule.id().cyan(),
            disabled,
            rule.description().dimmed()
        );
    }

    println!();
    Ok(exit_codes::SUCCESS)
}

fn severity_tag(severity: Severity) -> String {
    let label = format!("{:<10}", severity.label());
    match severity {
        Severity::Critical | Severity::High => label.red().bold().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Low | Severity::Suggestion => label.blue().to_string(),
    }
}
