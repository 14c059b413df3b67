//! Configuration loading and typed config structures for Guildhall.
//!
//! The configuration lives in `guildhall-config.yaml` at the project root.
//! Every field has a default, so an empty file (or no file) yields a
//! working setup with the reference allocation rules.

use std::path::{Path, PathBuf};

use guildhall_db::PersistenceBackend;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::rules::AllocationRules;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `guildhall-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuildhallConfig {
    /// Allocation limits.
    #[serde(default)]
    pub governance: AllocationRules,

    /// Snapshot persistence.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Seconds between periodic occupancy flushes.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,

    /// World artifact export.
    #[serde(default)]
    pub world: WorldConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GuildhallConfig {
    fn default() -> Self {
        Self {
            governance: AllocationRules::default(),
            persistence: PersistenceConfig::default(),
            flush_interval_secs: default_flush_interval_secs(),
            world: WorldConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GuildhallConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `persistence.dragonfly_url`
    /// - `GUILDHALL_DATA_DIR` overrides `persistence.data_dir`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config
            .persistence
            .apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.governance.min_spacing.is_finite() || self.governance.min_spacing < 0.0 {
            return Err(ConfigError::Invalid {
                field: "governance.min_spacing",
                reason: format!("must be a non-negative number, got {}", self.governance.min_spacing),
            });
        }
        if self.governance.density_cap <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "governance.density_cap",
                reason: format!("must be positive, got {}", self.governance.density_cap),
            });
        }
        if self.flush_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "flush_interval_secs",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Which backend stores snapshots.
    #[serde(default)]
    pub backend: PersistenceBackend,

    /// Directory for the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// `Dragonfly` connection URL.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// Key the occupancy snapshot is stored under.
    #[serde(default = "default_snapshot_key")]
    pub key: String,
}

impl PersistenceConfig {
    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("DRAGONFLY_URL") {
            self.dragonfly_url = val;
        }
        if let Some(val) = lookup("GUILDHALL_DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: PersistenceBackend::default(),
            data_dir: default_data_dir(),
            dragonfly_url: default_dragonfly_url(),
            key: default_snapshot_key(),
        }
    }
}

/// World artifact configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Where to write the world map artifact at startup; skipped if unset.
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when
    /// set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_flush_interval_secs() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_dragonfly_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_snapshot_key() -> String {
    "guildhall:occupancy".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
