//! Output formats for command payloads on stdout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sieve_config::LoadSummary;
use sieve_core::{FirstMatch, ScanReport};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,

    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a first-match result.
///
/// Text output is the matched run followed by a tab and its tag, or nothing.
pub fn render_first(first: &FirstMatch, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(first),
        OutputFormat::Text if first.is_match() => Ok(format!("{}\t{}\n", first.keyword, first.tag)),
        OutputFormat::Text => Ok(String::new()),
    }
}

/// Render a scan report. Text output is the redacted text only.
pub fn render_scan(report: &ScanReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(report),
        OutputFormat::Text if report.text.ends_with('\n') => Ok(report.text.clone()),
        OutputFormat::Text => Ok(format!("{}\n", report.text)),
    }
}

/// Render the patterns rejected while loading keywords.
///
/// Text output has one `source<TAB>tag<TAB>pattern` line per rejection.
pub fn render_load_summary(
    summary: &LoadSummary,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(summary),
        OutputFormat::Text => {
            let mut out = String::new();
            for source in &summary.sources {
                for pattern in &source.rejected {
                    out.push_str(&format!("{}\t{}\t{}\n", source.source, source.tag, pattern));
                }
            }
            Ok(out)
        }
    }
}
