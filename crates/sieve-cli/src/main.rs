//! sieve - keyword finder and redactor.
//!
//! Loads tagged keyword lists (from `sieve.json`, `--list` files and
//! `--word` patterns), then finds the first keyword in a text or masks every
//! keyword with `*`.

use clap::{Args, Parser, Subcommand};
use sieve_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use sieve_cli::output::{render_first, render_load_summary, render_scan};
use sieve_cli::{ExitCode, OutputFormat};
use sieve_config::{load_config, LoadSummary};
use sieve_core::Matcher;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// Find and redact tagged keywords in text
#[derive(Parser)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to the keyword manifest (sieve.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra keyword list file (tag 0, auto-replace); repeatable
    #[arg(short = 'l', long = "list", global = true)]
    lists: Vec<PathBuf>,

    /// Extra keyword pattern (tag 0, auto-replace); repeatable
    #[arg(short = 'w', long = "word", global = true)]
    words: Vec<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Log level for stderr
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format for stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first keyword in the text and its tag
    Find(TextArgs),

    /// Mask every auto-replace keyword and report matches by tag
    Redact(TextArgs),

    /// Load every configured keyword source and report rejected patterns
    Check,
}

#[derive(Args, Debug)]
struct TextArgs {
    /// Text to scan (reads stdin when omitted)
    text: Option<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match load_matcher(&cli.global) {
        Ok((matcher, summary)) => match cli.command {
            Commands::Find(args) => run_find(&cli.global, &matcher, &args),
            Commands::Redact(args) => run_redact(&cli.global, &matcher, &args),
            Commands::Check => run_check(&cli.global, &summary),
        },
        Err(code) => code,
    };

    std::process::exit(exit_code.as_i32());
}

/// Build the matcher from the manifest plus `--list` and `--word` sources.
fn load_matcher(global: &GlobalOpts) -> Result<(Matcher, LoadSummary), ExitCode> {
    let (mut config, paths) = load_config(global.config.as_deref()).map_err(|e| {
        error!(error = %e, code = e.code(), "failed to load configuration");
        ExitCode::from(&e)
    })?;

    // Command-line lists are relative to the working directory, not the manifest.
    let cwd = std::env::current_dir().unwrap_or_default();
    for list in &global.lists {
        config.push_list(cwd.join(list));
    }
    for word in &global.words {
        config.push_word(word.as_str());
    }

    let matcher = Matcher::new();
    let summary = config.load_into(&matcher).map_err(|e| {
        error!(error = %e, code = e.code(), "failed to load keywords");
        ExitCode::from(&e)
    })?;

    info!(
        source = %paths.source,
        nodes = matcher.node_count(),
        rejected = summary.rejected_count(),
        "keywords loaded"
    );
    Ok((matcher, summary))
}

fn read_text(args: &TextArgs) -> Result<String, ExitCode> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text).map_err(|e| {
        error!(error = %e, "failed to read stdin");
        ExitCode::IoError
    })?;
    Ok(text)
}

fn emit(rendered: serde_json::Result<String>, format: OutputFormat) -> Result<(), ExitCode> {
    let mut payload = rendered.map_err(|e| {
        error!(error = %e, "failed to serialize output");
        ExitCode::InternalError
    })?;
    if format == OutputFormat::Json {
        payload.push('\n');
    }
    std::io::stdout()
        .write_all(payload.as_bytes())
        .map_err(|e| {
            error!(error = %e, "failed to write output");
            ExitCode::IoError
        })
}

fn run_find(global: &GlobalOpts, matcher: &Matcher, args: &TextArgs) -> ExitCode {
    let text = match read_text(args) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let first = matcher.first(&text);
    if let Err(code) = emit(render_first(&first, global.format), global.format) {
        return code;
    }

    if first.is_match() {
        ExitCode::MatchesFound
    } else {
        ExitCode::Clean
    }
}

fn run_redact(global: &GlobalOpts, matcher: &Matcher, args: &TextArgs) -> ExitCode {
    let text = match read_text(args) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let report = matcher.scan(&text);
    info!(matches = report.match_count(), tags = report.matches.len(), "scan complete");
    if let Err(code) = emit(render_scan(&report, global.format), global.format) {
        return code;
    }

    if report.is_clean() {
        ExitCode::Clean
    } else {
        ExitCode::MatchesFound
    }
}

fn run_check(global: &GlobalOpts, summary: &LoadSummary) -> ExitCode {
    if let Err(code) = emit(render_load_summary(summary, global.format), global.format) {
        return code;
    }

    if summary.rejected_count() > 0 {
        ExitCode::PatternsRejected
    } else {
        ExitCode::Clean
    }
}
