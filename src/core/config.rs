//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Browse behavior is tunable per deployment: how many sibling names fit on
//! one page, how full a bin must be before the partitioner may close it,
//! and whether empty categories show by default.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$VOCABTREE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/vocabtree/config.toml`
//! 3. `~/.vocabtree/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```toml
//! [browse]
//! max_per_page = 40
//! fill_factor = 0.8
//! show_empty = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default page capacity when no config is present.
pub const DEFAULT_MAX_PER_PAGE: usize = 50;

/// Default soft-fill factor for the partitioner.
pub const DEFAULT_FILL_FACTOR: f64 = 0.8;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Browse tuning values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BrowseConfig {
    /// Preferred page capacity for sibling browse lists
    pub max_per_page: Option<usize>,

    /// Soft-fill factor before the partitioner may close a bin
    pub fill_factor: Option<f64>,

    /// Whether zero-count nodes appear in browse results by default
    pub show_empty: Option<bool>,
}

/// Top-level configuration file schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Browse tuning
    pub browse: BrowseConfig,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// A missing file is not an error; defaults apply. A present but
    /// malformed or invalid file is an error, so a typo never silently
    /// reverts a deployment to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Locate the config file, honoring `$VOCABTREE_CONFIG` first.
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("VOCABTREE_CONFIG") {
            if !explicit.is_empty() {
                return Some(PathBuf::from(explicit));
            }
        }

        if let Some(xdg) = dirs::config_dir() {
            let candidate = xdg.join("vocabtree").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let candidate = home.join(".vocabtree").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        None
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.browse.max_per_page {
            if max < 2 {
                return Err(ConfigError::InvalidValue(format!(
                    "max_per_page must be at least 2, got {}",
                    max
                )));
            }
        }

        if let Some(fill) = self.browse.fill_factor {
            if !(fill > 0.0 && fill <= 1.0) {
                return Err(ConfigError::InvalidValue(format!(
                    "fill_factor must be in (0, 1], got {}",
                    fill
                )));
            }
        }

        Ok(())
    }

    /// Page capacity with the default applied.
    pub fn max_per_page(&self) -> usize {
        self.browse.max_per_page.unwrap_or(DEFAULT_MAX_PER_PAGE)
    }

    /// Soft-fill factor with the default applied.
    pub fn fill_factor(&self) -> f64 {
        self.browse.fill_factor.unwrap_or(DEFAULT_FILL_FACTOR)
    }

    /// Whether empty nodes show by default.
    pub fn show_empty(&self) -> bool {
        self.browse.show_empty.unwrap_or(false)
    }
}
