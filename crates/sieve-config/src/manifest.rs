//! Keyword manifest (`sieve.json`).
//!
//! The manifest names the keyword lists to load and any inline words, each
//! with the tag and auto-replace flag its patterns are installed under.
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "lists": [ { "path": "profanity.txt", "tag": 1, "auto_replace": true } ],
//!   "words": [ { "pattern": "tomato", "tag": 2, "auto_replace": false } ]
//! }
//! ```

use crate::validate::ConfigError;
use serde::{Deserialize, Serialize};
use sieve_core::Matcher;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

/// A keyword list file: one pattern per line, `#` starts a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordList {
    /// File path. Relative paths resolve against the manifest's directory.
    pub path: PathBuf,

    /// Tag for every pattern in the list.
    #[serde(default)]
    pub tag: u8,

    /// Whether matches are masked during redaction.
    #[serde(default = "default_true")]
    pub auto_replace: bool,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single inline pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub pattern: String,

    #[serde(default)]
    pub tag: u8,

    #[serde(default = "default_true")]
    pub auto_replace: bool,
}

/// Keyword configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Keyword list files.
    #[serde(default)]
    pub lists: Vec<KeywordList>,

    /// Inline patterns.
    #[serde(default)]
    pub words: Vec<KeywordEntry>,

    /// Directory of the manifest file, for relative list paths.
    #[serde(skip)]
    pub(crate) base_dir: Option<PathBuf>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            lists: Vec::new(),
            words: Vec::new(),
            base_dir: None,
        }
    }
}

/// Patterns rejected while loading one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutcome {
    /// List path, or `inline` for manifest words.
    pub source: String,
    pub tag: u8,
    pub rejected: Vec<String>,
}

/// Result of loading a configuration into a matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub sources: Vec<SourceOutcome>,
}

impl LoadSummary {
    /// Total rejected patterns across all sources.
    pub fn rejected_count(&self) -> usize {
        self.sources.iter().map(|s| s.rejected.len()).sum()
    }
}

impl KeywordConfig {
    /// Load the manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::parse_json(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse the manifest from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Append a list given on the command line (tag 0, auto-replace).
    pub fn push_list(&mut self, path: impl Into<PathBuf>) {
        self.lists.push(KeywordList {
            path: path.into(),
            tag: 0,
            auto_replace: true,
            description: None,
        });
    }

    /// Append an inline word given on the command line (tag 0, auto-replace).
    pub fn push_word(&mut self, pattern: impl Into<String>) {
        self.words.push(KeywordEntry {
            pattern: pattern.into(),
            tag: 0,
            auto_replace: true,
        });
    }

    /// Resolve a list path against the manifest directory.
    pub fn list_path(&self, list: &KeywordList) -> PathBuf {
        match &self.base_dir {
            Some(base) if list.path.is_relative() => base.join(&list.path),
            _ => list.path.clone(),
        }
    }

    /// Install every list and inline word into `matcher`.
    ///
    /// Rejected patterns are collected per source. The first list that
    /// cannot be read aborts loading; sources loaded before it stay in the
    /// matcher.
    pub fn load_into(&self, matcher: &Matcher) -> Result<LoadSummary, ConfigError> {
        let mut summary = LoadSummary::default();

        for list in &self.lists {
            let path = self.list_path(list);
            let rejected = matcher
                .add_from_file(&path, list.tag, list.auto_replace)
                .map_err(|source| ConfigError::ListLoad {
                    path: path.display().to_string(),
                    source,
                })?;
            if !rejected.is_empty() {
                warn!(path = %path.display(), rejected = rejected.len(), "keyword list has rejected patterns");
            }
            summary.sources.push(SourceOutcome {
                source: path.display().to_string(),
                tag: list.tag,
                rejected,
            });
        }

        for word in &self.words {
            let rejected = matcher.add_many([word.pattern.as_str()], word.tag, word.auto_replace);
            if rejected.is_empty() {
                continue;
            }
            warn!(pattern = %word.pattern, "inline pattern rejected");
            match summary
                .sources
                .iter_mut()
                .find(|s| s.source == "inline" && s.tag == word.tag)
            {
                Some(outcome) => outcome.rejected.extend(rejected),
                None => summary.sources.push(SourceOutcome {
                    source: "inline".to_string(),
                    tag: word.tag,
                    rejected,
                }),
            }
        }

        debug!(
            lists = self.lists.len(),
            words = self.words.len(),
            rejected = summary.rejected_count(),
            "keyword configuration loaded"
        );
        Ok(summary)
    }
}
