//! Oracle configuration.
//!
//! Construction parameters are read from `quoracle.toml` in the data
//! directory. They are fixed for the lifetime of an oracle instance.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use quoracle_types::{Address, AssetInfo, MILLIS_PER_SECOND};

use crate::bound::PERCENT;
use crate::math::pow10;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "quoracle.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "QUORACLE_DATA_DIR";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Maximum proof age and cache TTL, in seconds.
    #[serde(default = "default_expiration_offset")]
    pub expiration_offset_sec: u64,
    /// Allowed deviation in `price_in_bound`, in percent.
    #[serde(default = "default_bound_threshold")]
    pub bound_threshold_percent: u32,
    /// Fixed-point scale factor for inverse prices.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: u64,
    /// Deployer / initial owner.
    #[serde(default)]
    pub owner: Address,
    /// Registered assets.
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// The immutable numeric parameters of an oracle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleParams {
    pub expiration_offset_sec: u64,
    pub bound_threshold_percent: u32,
    pub scale_factor: u128,
}

// Default value functions

fn default_expiration_offset() -> u64 {
    3600
}

fn default_bound_threshold() -> u32 {
    10
}

fn default_scale_factor() -> u64 {
    1_000_000_000_000_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            expiration_offset_sec: default_expiration_offset(),
            bound_threshold_percent: default_bound_threshold(),
            scale_factor: default_scale_factor(),
            owner: Address::ZERO,
            assets: Vec::new(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for OracleParams {
    fn default() -> Self {
        OracleConfig::default().params()
    }
}

impl OracleConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if path.exists() {
            Self::from_path(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check the construction parameters.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Invalid`] for an expiration offset whose millisecond
    ///   value overflows `u64`, a zero scale factor, a threshold over 100%, a
    ///   duplicated asset, or a precision finer than the scale factor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .expiration_offset_sec
            .checked_mul(MILLIS_PER_SECOND)
            .is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "expiration offset {}s overflows when expressed in milliseconds",
                self.expiration_offset_sec
            )));
        }
        if self.scale_factor == 0 {
            return Err(ConfigError::Invalid("scale factor must be non-zero".into()));
        }
        if u128::from(self.bound_threshold_percent) > PERCENT {
            return Err(ConfigError::Invalid(format!(
                "bound threshold {}% exceeds 100%",
                self.bound_threshold_percent
            )));
        }

        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.address) {
                return Err(ConfigError::Invalid(format!(
                    "asset {} registered twice",
                    asset.address
                )));
            }
            let unit = pow10(asset.precision)
                .map_err(|_| ConfigError::Invalid(format!("precision {} too large", asset.precision)))?;
            if unit > u128::from(self.scale_factor) {
                return Err(ConfigError::Invalid(format!(
                    "asset {} precision {} is finer than the scale factor",
                    asset.oracle_denom, asset.precision
                )));
            }
        }
        Ok(())
    }

    /// Numeric construction parameters.
    pub fn params(&self) -> OracleParams {
        OracleParams {
            expiration_offset_sec: self.expiration_offset_sec,
            bound_threshold_percent: self.bound_threshold_percent,
            scale_factor: u128::from(self.scale_factor),
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        Self::default_data_dir().join(CONFIG_FILE)
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Quoracle")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Quoracle")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs_fallback(".quoracle")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/quoracle"))
}
