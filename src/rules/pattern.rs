//! Config-defined pattern rules
//!
//! Each `custom_rules` entry in the configuration compiles into a
//! [`PatternRule`]: a regex matched per file, optionally restricted by file
//! globs, optionally inverted ("report when the pattern is missing").
//! Compiled rules register like any other rule; the engine never
//! special-cases them.

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::config::CustomRuleDef;
use crate::error::{CodewardenError, RuleError};
use crate::rules::{Category, Detection, Rule, RuleContext, Severity};

/// Cap on reported match locations per file.
const MAX_LOCATIONS_PER_FILE: usize = 5;

/// A rule compiled from a configuration entry.
pub struct PatternRule {
    id: String,
    name: String,
    description: String,
    category: Category,
    severity: Severity,
    regex: Regex,
    files: Option<GlobSet>,
    message: Option<String>,
    fix: Option<String>,
    invert: bool,
}

impl PatternRule {
    /// Compile a configuration entry into a rule. Fails on an invalid
    /// regex or glob.
    pub fn compile(def: &CustomRuleDef) -> Result<Self, CodewardenError> {
        let regex = Regex::new(&def.pattern).map_err(|e| RuleError::InvalidField {
            field: "pattern".to_string(),
            reason: e.to_string(),
        })?;

        let files = if def.files.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for glob in &def.files {
                builder.add(Glob::new(glob).map_err(|e| RuleError::InvalidField {
                    field: "files".to_string(),
                    reason: e.to_string(),
                })?);
            }
            Some(builder.build().map_err(|e| RuleError::InvalidField {
                field: "files".to_string(),
                reason: e.to_string(),
            })?)
        };

        Ok(Self {
            id: format!("custom/{}", def.id),
            name: format!("Custom pattern '{}'", def.id),
            description: if def.invert {
                format!("Requires the pattern '{}' to be present", def.pattern)
            } else {
                format!("Flags occurrences of the pattern '{}'", def.pattern)
            },
            category: def.category,
            severity: def.severity,
            regex,
            files,
            message: def.message.clone(),
            fix: def.fix.clone(),
            invert: def.invert,
        })
    }

    /// Compile every definition, skipping invalid entries with a warning.
    pub fn compile_all(defs: &[CustomRuleDef]) -> Vec<PatternRule> {
        let mut rules = Vec::with_capacity(defs.len());
        for def in defs {
            match Self::compile(def) {
                Ok(rule) => rules.push(rule),
                Err(error) => {
                    tracing::warn!(rule_id = %def.id, %error, "skipping invalid custom rule");
                }
            }
        }
        rules
    }

    fn applies_to(&self, path: &str) -> bool {
        match &self.files {
            None => true,
            Some(set) => set.is_match(path),
        }
    }
}

#[async_trait::async_trait]
impl Rule for PatternRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn check(&self, ctx: &RuleContext) -> Result<Vec<Detection>, CodewardenError> {
        if !self.applies_to(&ctx.file_path) {
            return Ok(vec![]);
        }

        if self.invert {
            if self.regex.is_match(&ctx.content) {
                return Ok(vec![]);
            }
            let explanation = self.message.clone().unwrap_or_else(|| {
                format!("Required pattern '{}' not found", self.regex.as_str())
            });
            let fix = self
                .fix
                .clone()
                .unwrap_or_else(|| "Add the required content to this file".to_string());
            return Ok(vec![Detection::new(explanation, fix)]);
        }

        let mut detections = Vec::new();
        for (line_number, line) in ctx.numbered_lines() {
            if !self.regex.is_match(line) {
                continue;
            }
            let explanation = self
                .message
                .clone()
                .unwrap_or_else(|| format!("Pattern '{}' matched", self.regex.as_str()));
            let fix = self
                .fix
                .clone()
                .unwrap_or_else(|| "Remove or rework the flagged content".to_string());
            detections.push(
                Detection::new(explanation, fix)
                    .with_line(line_number)
                    .with_snippet(line.trim().to_string()),
            );
            if detections.len() >= MAX_LOCATIONS_PER_FILE {
                break;
            }
        }
        Ok(detections)
    }
}
