//! Exit codes for the sieve CLI.
//!
//! Exit code ranges:
//! - 0-9: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

/// Exit codes for sieve operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Nothing matched / every pattern accepted
    Clean = 0,

    /// At least one keyword matched
    MatchesFound = 1,

    /// Some configured patterns were rejected
    PatternsRejected = 2,

    /// Invalid arguments
    ArgsError = 10,

    /// Configuration could not be resolved, parsed or validated
    ConfigError = 11,

    /// A keyword list or the input text could not be read
    IoError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Operational outcome rather than an error (codes 0-9).
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::MatchesFound => "OK_MATCHES",
            ExitCode::PatternsRejected => "OK_REJECTED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::IoError => "ERR_IO",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<&sieve_config::ConfigError> for ExitCode {
    fn from(err: &sieve_config::ConfigError) -> Self {
        match err {
            sieve_config::ConfigError::ListLoad { .. } => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    }
}
