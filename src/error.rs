//! Error types for codewarden
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use thiserror::Error;

/// Main error type for codewarden
#[derive(Error, Debug)]
pub enum CodewardenError {
    /// Rule definition or evaluation errors
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Result serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised when a rule definition is rejected or a check fails
#[derive(Error, Debug)]
pub enum RuleError {
    /// A required field of a rule definition is missing or malformed
    #[error("Invalid rule definition, field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field
        field: String,
        /// Why the field was rejected
        reason: String,
    },

    /// A rule with the same id is already registered
    #[error("Rule '{id}' already exists in the registry")]
    AlreadyExists {
        /// The colliding rule id
        id: String,
    },

    /// A rule check reported a failure for one file
    #[error("Rule '{id}' failed: {message}")]
    CheckFailed {
        /// Id of the failing rule
        id: String,
        /// Failure description
        message: String,
    },
}

/// Errors that occur while persisting configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to write a configuration file
    #[error("Failed to write config '{path}': {source}")]
    Write {
        /// Path to the file that failed to write
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to serialize a configuration to TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
