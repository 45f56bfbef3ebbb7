//! Support modules for the `sieve` command-line tool.

pub mod exit_codes;
pub mod logging;
pub mod output;

pub use exit_codes::ExitCode;
pub use output::OutputFormat;
