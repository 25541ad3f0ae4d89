//! Abstract storage trait for occurrence stats.
//!
//! Backends only move whole `OccurrenceStats` snapshots in and out under a
//! key. Reconciling against a catalog happens one level up, in
//! [`OccurrenceStore`](super::OccurrenceStore), so every backend behaves the
//! same way on first run and after catalog edits.

use std::fmt;

use thiserror::Error;

use crate::error::ValidationError;
use crate::stats::OccurrenceStats;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or device error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data exists but is not a valid stats map.
    #[error("Corrupt stats data: {0}")]
    Corrupt(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Namespace under which one catalog's stats are stored.
///
/// Keys end up in file names, so they are restricted to characters that are
/// safe on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatsKey(String);

impl StatsKey {
    /// Creates a key, rejecting empty keys and path-like characters.
    ///
    /// # Errors
    /// - `EmptyStorageKey` if the key is blank
    /// - `InvalidStorageKey` if it contains anything other than letters,
    ///   digits, `-`, `_` or `.`, or starts with `.`
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyStorageKey);
        }
        if let Some(ch) = key
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(ValidationError::InvalidStorageKey { key, ch });
        }
        if key.starts_with('.') {
            return Err(ValidationError::InvalidStorageKey { key, ch: '.' });
        }
        Ok(Self(key))
    }

    /// Derives a key from a catalog file path, using its file stem.
    ///
    /// `assets/jackbox_games.json` becomes `jackbox_games`.
    ///
    /// # Errors
    /// As [`StatsKey::new`], applied to the stem.
    pub fn for_catalog(path: impl AsRef<std::path::Path>) -> Result<Self, ValidationError> {
        let stem = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(stem)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage trait for occurrence stats.
///
/// # Contract
/// - `load` returns `Ok(None)` when nothing was ever saved under the key;
///   that is not an error
/// - `save` replaces whatever was stored before, so repeating it is harmless
/// - a failed `save` must be reported, never swallowed
pub trait StatsStore: Send + Sync {
    /// Load the stats stored under `key`.
    fn load(&self, key: &StatsKey) -> Result<Option<OccurrenceStats>, StorageError>;

    /// Overwrite the stats stored under `key`.
    fn save(&self, key: &StatsKey, stats: &OccurrenceStats) -> Result<(), StorageError>;
}
