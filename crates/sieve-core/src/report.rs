//! Serializable results of matching calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First keyword found in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstMatch {
    /// Matched run of the original text, empty when nothing matched.
    pub keyword: String,
    /// Tag of the matching pattern, 0 when nothing matched.
    pub tag: u8,
}

impl FirstMatch {
    pub fn is_match(&self) -> bool {
        !self.keyword.is_empty()
    }
}

impl From<(String, u8)> for FirstMatch {
    fn from((keyword, tag): (String, u8)) -> Self {
        Self { keyword, tag }
    }
}

/// Result of a scan-and-redact pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Text with auto-replace matches masked.
    pub text: String,
    /// Matched runs per tag, in scan order.
    pub matches: BTreeMap<u8, Vec<String>>,
}

impl ScanReport {
    /// Total number of matches across all tags.
    pub fn match_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// True when nothing matched.
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }
}

impl From<(String, BTreeMap<u8, Vec<String>>)> for ScanReport {
    fn from((text, matches): (String, BTreeMap<u8, Vec<String>>)) -> Self {
        Self { text, matches }
    }
}
