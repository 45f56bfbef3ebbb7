//! Error types for the keyword matcher.

use thiserror::Error;

/// Result type for matcher operations.
pub type Result<T> = std::result::Result<T, SieveError>;

/// Errors that can occur while loading keywords.
///
/// Rejected patterns are not errors: they are returned as data from the
/// bulk insertion calls so that one bad line never aborts a batch.
#[derive(Error, Debug)]
pub enum SieveError {
    /// I/O error while opening or reading a keyword line source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SieveError {
    /// Returns the underlying I/O error kind.
    pub fn io_kind(&self) -> std::io::ErrorKind {
        match self {
            SieveError::Io(e) => e.kind(),
        }
    }
}
