//! Configuration management for fanlog

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{HandlerConfig, HandlerSet, LevelSpec, LineFormat, Logger};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Minimum level: 1-4 or "debug", "info", "warning" (anything else means error)
    #[serde(default)]
    pub level: LevelSpec,

    /// Log file name; no file handler when unset or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfile: Option<String>,

    /// Folder holding `logfile` (supports `~`); defaults to the working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logpath: Option<String>,

    /// Write to standard output (default: true)
    #[serde(default = "default_console")]
    pub console: bool,

    /// Line formatting flags
    #[serde(default)]
    pub format: LineFormat,
}

fn default_console() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: LevelSpec::default(),
            logfile: None,
            logpath: None,
            console: default_console(),
            format: LineFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Full path of the log file, if one is configured
    pub fn log_file_path(&self) -> Option<PathBuf> {
        let logfile = self.logfile.as_deref().filter(|f| !f.is_empty())?;
        let folder = self
            .logpath
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(expand_path);

        Some(match folder {
            Some(folder) => folder.join(logfile),
            None => PathBuf::from(logfile),
        })
    }

    /// Handlers described by this configuration
    pub fn handlers(&self) -> HandlerSet {
        let mut handlers = HandlerSet::empty();
        if self.console {
            handlers.insert(HandlerConfig::Stdout);
        }
        if let Some(path) = self.log_file_path() {
            handlers.insert(HandlerConfig::file(path));
        }
        handlers
    }

    /// Install handlers, format and level on `logger` with a single rebuild
    #[track_caller]
    pub fn apply(&self, logger: &Logger) {
        logger.set_format(self.format);
        logger.set_handlers(self.handlers());
        logger.configure(self.level.clone());
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Get the base configuration directory (~/.fanlog)
/// Falls back to ./.fanlog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| PathBuf::from(".fanlog"))
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".fanlog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
