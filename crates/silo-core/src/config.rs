//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/silo/config.toml)
//! 3. Environment variables (SILO_* prefix)
//!
//! Environment variables take precedence over config file values. The
//! defaults (`def_db`, version 1) double as the fallback configuration
//! used when a store is opened lazily without an explicit setup call.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "SILO";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (the SQLite database file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Database name; the file on disk is `<db_name>.db`
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Expected schema version, checked against the stored one on open
    #[serde(default = "default_db_version")]
    pub db_version: i32,

    /// Whether to trace statements at debug level
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_name: default_db_name(),
            db_version: default_db_version(),
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SILO_DATA_DIR, SILO_DB_NAME,
    ///    SILO_DB_VERSION, SILO_DEBUG)
    /// 2. Config file (~/.config/silo/config.toml or SILO_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SILO_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SILO_DB_NAME
        if let Ok(val) = std::env::var(format!("{}_DB_NAME", ENV_PREFIX)) {
            if !val.is_empty() {
                self.db_name = val;
            }
        }

        // SILO_DB_VERSION (ignored when not a number)
        if let Ok(val) = std::env::var(format!("{}_DB_VERSION", ENV_PREFIX)) {
            if let Ok(version) = val.parse() {
                self.db_version = version;
            }
        }

        // SILO_DEBUG
        if let Ok(val) = std::env::var(format!("{}_DEBUG", ENV_PREFIX)) {
            self.debug = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SILO_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("silo")
            .join("config.toml")
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.db_name))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("silo")
}

fn default_db_name() -> String {
    "def_db".to_string()
}

fn default_db_version() -> i32 {
    1
}
