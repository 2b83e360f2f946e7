//! History configuration and its loader

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bus::DEFAULT_CAPACITY;
use crate::error::{HistoryError, Result};

/// Environment variable prefix for overrides, e.g. `SUBEDIT_HISTORY_UNDO_LIMIT`
pub const ENV_PREFIX: &str = "SUBEDIT_HISTORY";

/// History engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum depth of the undo stack, unbounded when absent
    pub undo_limit: Option<usize>,
    /// Buffered notifications per subscriber
    pub event_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_limit: None,
            event_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl HistoryConfig {
    /// Configuration with a bounded undo stack
    pub fn with_undo_limit(undo_limit: usize) -> Self {
        Self {
            undo_limit: Some(undo_limit),
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(HistoryError::validation_error(
                "event_capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Loads [`HistoryConfig`] from a TOML file overlaid by environment variables
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader for the default configuration path
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Loader for a custom configuration path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// `<config dir>/subedit/history.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("subedit")
            .join("history.toml")
    }

    /// Path the loader reads from and writes to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate; a missing file yields defaults
    pub fn load(&self) -> Result<HistoryConfig> {
        let config = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .build()?;
        let history: HistoryConfig = config.try_deserialize()?;
        history.validate()?;
        debug!(
            path = %self.config_path.display(),
            undo_limit = ?history.undo_limit,
            "Loaded history configuration"
        );
        Ok(history)
    }

    /// Validate and write as TOML
    pub fn save(&self, history: &HistoryConfig) -> Result<()> {
        history.validate()?;
        let toml = toml::to_string(history)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
