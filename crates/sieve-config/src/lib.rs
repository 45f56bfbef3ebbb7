//! sieve keyword configuration loading and validation.
//!
//! This crate provides:
//! - The `sieve.json` manifest naming keyword lists and inline words
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Loading a manifest into a [`sieve_core::Matcher`]

pub mod manifest;
pub mod resolve;
pub mod validate;

pub use manifest::{KeywordConfig, KeywordEntry, KeywordList, LoadSummary, SourceOutcome};
pub use resolve::{load_config, resolve_config, ConfigPaths, ConfigSource};
pub use validate::{validate_config, ConfigError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
