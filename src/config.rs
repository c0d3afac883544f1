//! Configuration loading and generation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::recommend::{DEFAULT_MAX_DEVELOPERS, MAX_DEVELOPERS_CEILING};
use crate::models::recommendation::{Matching, Strategy};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Default analysis window
    pub window: String,

    /// Default recommendation strategy
    pub strategy: Strategy,

    /// Default matching policy for least-paired
    pub matching: Matching,

    /// Suppress recommendations above this many developers
    pub max_developers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            window: "1w".to_string(),
            strategy: Strategy::default(),
            matching: Matching::default(),
            max_developers: DEFAULT_MAX_DEVELOPERS,
        }
    }
}

/// Default log path: ~/.config/pair-sight/logs
fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pair-sight")
        .join("logs")
}

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pair-sight")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            let mut config = Config::default();
            if let Some(dir) = config_dir {
                config.log_path = dir.join("logs");
            }
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // If log_path was not explicitly set, use config file's directory/logs
        if config.log_path == default_log_path()
            && let Some(dir) = config_dir
        {
            config.log_path = dir.join("logs");
        }

        config.max_developers = config.max_developers.min(MAX_DEVELOPERS_CEILING);

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        format!(
            r#"# pair-sight configuration file
# https://github.com/owayo/pair-sight

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: ~/.config/pair-sight/logs)
# log_path = "~/.config/pair-sight/logs"

# Analysis window: <N>d, <N>w, <N>m, <N>y or YYYY-MM-DD..YYYY-MM-DD (default: "1w")
window = "1w"

# Recommendation strategy: "least-paired" or "least-recent" (default: "least-paired")
strategy = "least-paired"

# Matching policy for least-paired: "greedy" or "optimal" (default: "greedy")
matching = "greedy"

# Skip recommendations for teams larger than this (default: {DEFAULT_MAX_DEVELOPERS}, max: {MAX_DEVELOPERS_CEILING})
max_developers = {DEFAULT_MAX_DEVELOPERS}
"#
        )
    }
}
