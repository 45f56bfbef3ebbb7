//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → system → defaults.

use crate::manifest::KeywordConfig;
use crate::validate::{validate_config, ConfigError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to sieve.json (or None if not found).
    pub config: Option<PathBuf>,

    /// Where the manifest was found (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/sieve/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "SIEVE_CONFIG";
pub const ENV_CONFIG_DIR: &str = "SIEVE_CONFIG_DIR";

/// Standard manifest file name.
pub const CONFIG_FILENAME: &str = "sieve.json";

/// Application name for XDG directories.
const APP_NAME: &str = "sieve";

/// Resolve the manifest path.
///
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. SIEVE_CONFIG environment variable
/// 3. SIEVE_CONFIG_DIR environment variable + sieve.json
/// 4. XDG config directory (~/.config/sieve/)
/// 5. System config (/etc/sieve/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    if let Some(path) = cli_path {
        return ConfigPaths {
            config: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(CONFIG_FILENAME);
    if system_path.exists() {
        return found(system_path, ConfigSource::SystemConfig);
    }

    ConfigPaths::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPaths {
    ConfigPaths {
        config: Some(path),
        source,
    }
}

/// Resolve, read and validate the manifest.
///
/// Without any manifest the built-in empty configuration is returned.
pub fn load_config(cli_path: Option<&Path>) -> Result<(KeywordConfig, ConfigPaths), ConfigError> {
    let paths = resolve_config(cli_path);
    let config = match &paths.config {
        Some(path) => KeywordConfig::from_file(path)?,
        None => KeywordConfig::default(),
    };
    validate_config(&config)?;

    debug!(
        source = %paths.source,
        path = ?paths.config,
        lists = config.lists.len(),
        "configuration resolved"
    );
    Ok((config, paths))
}

/// Get the XDG config directory for sieve.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
