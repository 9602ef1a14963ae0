//! In-memory validated rule catalog
//!
//! The registry is an explicitly constructed value that callers pass to the
//! engine by reference. It is never global state, so repeated or concurrent
//! engine runs in one process cannot cross-contaminate each other.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CodewardenError, RuleError};
use crate::rules::{Category, Rule};

/// A registered rule annotated with a derived disabled flag.
#[derive(Clone)]
pub struct RuleStatus {
    /// The registered rule.
    pub rule: Arc<dyn Rule>,
    /// True when the rule id appears in the disabled list.
    pub disabled: bool,
}

/// Validated catalog of rule definitions, in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single rule.
    ///
    /// Rejects definitions with an empty id or name, and rejects id
    /// collisions. On success the rule becomes read-only catalog state.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), CodewardenError> {
        if rule.id().trim().is_empty() {
            return Err(RuleError::InvalidField {
                field: "id".to_string(),
                reason: "must be a non-empty string".to_string(),
            }
            .into());
        }

        if rule.name().trim().is_empty() {
            return Err(RuleError::InvalidField {
                field: "name".to_string(),
                reason: "must be a non-empty string".to_string(),
            }
            .into());
        }

        if self.index.contains_key(rule.id()) {
            return Err(RuleError::AlreadyExists {
                id: rule.id().to_string(),
            }
            .into());
        }

        self.index.insert(rule.id().to_string(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Register several rules, stopping at the first failure.
    pub fn register_many(
        &mut self,
        rules: impl IntoIterator<Item = Arc<dyn Rule>>,
    ) -> Result<(), CodewardenError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(())
    }

    /// Remove a rule by id. Removing an unknown id is a no-op.
    pub fn unregister(&mut self, id: &str) {
        if let Some(position) = self.index.remove(id) {
            self.rules.remove(position);
            for slot in self.index.values_mut() {
                if *slot > position {
                    *slot -= 1;
                }
            }
        }
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.index.get(id).map(|&i| Arc::clone(&self.rules[i]))
    }

    /// True when a rule with this id is registered.
    pub fn has(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Snapshot of every registered rule, in registration order.
    pub fn all(&self) -> Vec<Arc<dyn Rule>> {
        self.rules.iter().map(Arc::clone).collect()
    }

    /// Every rule in the given category.
    pub fn by_category(&self, category: Category) -> Vec<Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| r.category() == category)
            .map(Arc::clone)
            .collect()
    }

    /// Every rule applicable to the given framework: rules with no
    /// restriction plus rules whose allow-list contains `framework`.
    pub fn by_framework(&self, framework: &str) -> Vec<Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| match r.frameworks() {
                None => true,
                Some(list) => list.iter().any(|f| f.eq_ignore_ascii_case(framework)),
            })
            .map(Arc::clone)
            .collect()
    }

    /// Every rule annotated with a disabled flag derived from the given
    /// id list. Stored entries are not mutated.
    pub fn all_with_status(&self, disabled_ids: &[String]) -> Vec<RuleStatus> {
        self.rules
            .iter()
            .map(|rule| RuleStatus {
                disabled: disabled_ids.iter().any(|id| id == rule.id()),
                rule: Arc::clone(rule),
            })
            .collect()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
