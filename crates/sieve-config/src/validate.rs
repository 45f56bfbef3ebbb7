//! Configuration errors and semantic validation.

use crate::manifest::KeywordConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ConfigError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Failed to load keyword list {path}: {source}")]
    ListLoad {
        path: String,
        #[source]
        source: sieve_core::SieveError,
    },
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::IoError(_) => 60,
            ConfigError::ParseError(_) => 61,
            ConfigError::SemanticError(_) => 63,
            ConfigError::InvalidValue { .. } => 65,
            ConfigError::VersionMismatch { .. } => 66,
            ConfigError::ListLoad { .. } => 67,
        }
    }
}

/// Validate a keyword configuration semantically.
pub fn validate_config(config: &KeywordConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let mut seen = HashSet::new();
    for (idx, list) in config.lists.iter().enumerate() {
        if list.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("lists[{}].path", idx),
                message: "path must not be empty".to_string(),
            });
        }
        if !seen.insert((&list.path, list.tag)) {
            return Err(ConfigError::SemanticError(format!(
                "keyword list {} is listed twice with tag {}",
                list.path.display(),
                list.tag
            )));
        }
    }

    for (idx, word) in config.words.iter().enumerate() {
        if word.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("words[{}].pattern", idx),
                message: "pattern must not be empty".to_string(),
            });
        }
    }

    Ok(())
}
