//! CLI module - argument parsing and command dispatch

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::rules::{Category, Severity};

/// Audit a source tree with a pluggable rule engine
#[derive(Parser)]
#[command(name = "codewarden", version, about)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a source tree and report violations
    Check(commands::check::CheckArgs),
    /// List the registered rules
    Rules(commands::rules::RulesArgs),
    /// Write a starter project configuration
    Init(commands::init::InitArgs),
}

/// Parse a severity name for a CLI flag.
pub(crate) fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::from_string(s).ok_or_else(|| {
        format!("unknown severity '{s}' (expected critical, high, medium, low or suggestion)")
    })
}

/// Parse a category name for a CLI flag.
pub(crate) fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_string(s).ok_or_else(|| format!("unknown category '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_check_flags() {
        let cli = Cli::try_parse_from([
            "codewarden",
            "check",
            ".",
            "--min-severity",
            "medium",
            "--fail-on-severity",
            "high",
            "--disable-rule",
            "style/no-debug-logging",
            "--category",
            "security",
            "--category",
            "testing",
            "--sequential",
        ])
        .unwrap();

        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.min_severity, Some(Severity::Medium));
        assert_eq!(args.fail_on_severity, Some(Severity::High));
        assert_eq!(args.disable_rule.len(), 1);
        assert_eq!(args.category, vec![Category::Security, Category::Testing]);
        assert!(args.sequential);
    }

    #[test]
    fn test_cli_rejects_unknown_severity() {
        let result = Cli::try_parse_from(["codewarden", "check", "--min-severity", "warning"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_severity("critical"), Ok(Severity::Critical));
        assert!(parse_severity("urgent").is_err());
        assert_eq!(parse_category("style"), Ok(Category::Style));
        assert!(parse_category("vibes").is_err());
    }
}
