//! Builtin rule catalog
//!
//! A small set of generally useful rules so the tool works out of the box.
//! Each one is an ordinary implementation of the [`Rule`] contract; the
//! engine never special-cases builtins.

pub mod quality;
pub mod security;
pub mod testing;

use std::sync::Arc;

use crate::rules::Rule;

/// Every builtin rule, in catalog order.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(security::HardcodedSecretRule),
        Arc::new(security::DangerousHtmlRule::new()),
        Arc::new(quality::DebugLoggingRule),
        Arc::new(quality::TodoMarkerRule),
        Arc::new(quality::OversizedFileRule),
        Arc::new(testing::MissingTestRule),
    ]
}
