//! Configuration management for Taro.
//!
//! Loads configuration from ${TARO_HOME}/config.toml with sensible defaults.
//! A missing file is not an error; every field has a default so a fresh
//! deployment runs without any configuration at all.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name used in logs and card titles.
    pub app_name: String,
    /// Enables verbose diagnostics.
    pub debug: bool,
    /// Default log level when RUST_LOG is not set.
    pub log_level: String,
    /// Directory for daily-rolled log files.
    pub log_dir: String,
    /// Character threshold at which buffered assistant text is flushed as a
    /// card chunk.
    pub chunk_size: usize,
    /// Recursion limit forwarded to the agent engine per turn.
    pub recursion_limit: u32,
    /// Storage folder for built knowledge bases.
    pub kb_folder: String,
    /// SQLite file backing the document-sync store.
    pub db_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Taro".to_string(),
            debug: false,
            log_level: "info".to_string(),
            log_dir: "work_dirs".to_string(),
            chunk_size: 30,
            recursion_limit: 25,
            kb_folder: "resources/kb".to_string(),
            db_file: "resources/db/taro.db".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads the configuration from an explicit path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }
}

pub mod paths {
    //! Path resolution for Taro configuration and data directories.
    //!
    //! TARO_HOME resolution order:
    //! 1. TARO_HOME environment variable (if set)
    //! 2. ~/.config/taro (default)

    use std::path::PathBuf;

    /// Returns the Taro home directory.
    pub fn taro_home() -> PathBuf {
        if let Ok(home) = std::env::var("TARO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("taro"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taro_home().join("config.toml")
    }
}
