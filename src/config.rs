//! Storage configuration.
//!
//! Defaults put stats under `~/.game_randomizer`. The environment can move
//! them (`GAME_RANDOMIZER_DATA_DIR`) or turn off fsync
//! (`GAME_RANDOMIZER_SYNC=0`); command-line flags override both.

use std::env;
use std::path::PathBuf;

use crate::error::ValidationError;

/// Environment variable overriding the stats directory.
pub const DATA_DIR_ENV: &str = "GAME_RANDOMIZER_DATA_DIR";

/// Environment variable controlling fsync on save.
pub const SYNC_ENV: &str = "GAME_RANDOMIZER_SYNC";

const DEFAULT_DIR_NAME: &str = ".game_randomizer";

/// Where and how occurrence stats are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one stats file per catalog.
    pub data_dir: PathBuf,
    /// Whether to fsync after every save (slower but safer).
    pub sync_on_write: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: home_dir().unwrap_or_else(|| PathBuf::from(".")).join(DEFAULT_DIR_NAME),
            sync_on_write: true,
        }
    }
}

impl StorageConfig {
    /// Defaults, overridden by the environment.
    ///
    /// # Errors
    /// `InvalidConfig` if `GAME_RANDOMIZER_SYNC` is not a recognised boolean.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = env::var(SYNC_ENV) {
            config.sync_on_write = parse_bool(&raw).ok_or_else(|| ValidationError::InvalidConfig {
                reason: format!("{SYNC_ENV} must be a boolean, got '{raw}'"),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Overrides the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if `data_dir` is empty or points at an existing file.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidConfig {
                reason: "data_dir cannot be empty".to_string(),
            });
        }
        if self.data_dir.is_file() {
            return Err(ValidationError::InvalidConfig {
                reason: format!("data_dir {} is a file", self.data_dir.display()),
            });
        }
        Ok(())
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
