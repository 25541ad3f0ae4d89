//! Error types for the game randomizer.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! specific conditions and decide how to present them. The core never prints;
//! it hands these back to whoever drives it.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::ItemId;
use crate::storage::StorageError;

/// Validation errors raised for bad inputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Player count must be at least 1")]
    ZeroPlayerCount,

    #[error("Storage key cannot be empty")]
    EmptyStorageKey,

    #[error("Storage key '{key}' contains invalid character {ch:?}")]
    InvalidStorageKey {
        key: String,
        ch: char,
    },

    #[error("Item '{id}' must support at least 1 player")]
    ZeroMinPlayers {
        id: String,
    },

    #[error("Item '{id}' has weight {weight}; weights must be greater than 0 and at most 1e12")]
    InvalidWeight {
        id: String,
        weight: f64,
    },

    #[error("Item identifier cannot be empty")]
    EmptyItemId,

    #[error("Invalid storage configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Catalog contains no games")]
    Empty,

    #[error("Invalid catalog entry: {0}")]
    InvalidItem(#[from] ValidationError),
}

/// Top-level error type for the randomizer.
#[derive(Debug, Error)]
pub enum RandomizerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog load error: {0}")]
    CatalogLoad(#[from] CatalogError),

    /// The storage backend could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted counts exist but could not be read back.
    #[error("Occurrence stats for '{key}' could not be loaded: {source}")]
    StatsLoad {
        key: String,
        #[source]
        source: StorageError,
    },

    /// The pick happened and counts were updated in memory, but the write
    /// to storage failed.
    #[error("Picked '{item}' but saving occurrence stats failed: {source}")]
    PersistenceWrite {
        item: ItemId,
        #[source]
        source: StorageError,
    },

    /// Saving outside of a pick (explicit flush) failed.
    #[error("Saving occurrence stats for '{key}' failed: {source}")]
    SaveFailed {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("No game supports {player_count} player(s)")]
    NoEligibleItems {
        player_count: u32,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl RandomizerError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if no game fits the requested player count.
    #[must_use]
    pub const fn is_no_eligible_items(&self) -> bool {
        matches!(self, Self::NoEligibleItems { .. })
    }

    /// Returns true if the pick itself succeeded and only durability is in doubt.
    #[must_use]
    pub const fn is_persistence_write(&self) -> bool {
        matches!(self, Self::PersistenceWrite { .. })
    }

    /// The item that was picked before the error, if any.
    #[must_use]
    pub const fn picked_item(&self) -> Option<&ItemId> {
        match self {
            Self::PersistenceWrite { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Returns true if retrying the failed write may succeed.
    ///
    /// Catalog, stats-load and eligibility errors describe bad data and will
    /// fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PersistenceWrite { .. }
                | Self::SaveFailed { .. }
                | Self::Storage(StorageError::Io(_))
        )
    }
}

/// Result type alias for randomizer operations.
pub type RandomizerResult<T> = Result<T, RandomizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_weight() {
        let err = ValidationError::InvalidWeight {
            id: "Quiplash".to_string(),
            weight: -2.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Quiplash"));
        assert!(msg.contains("-2"));
    }

    #[test]
    fn test_catalog_error_empty() {
        let err: RandomizerError = CatalogError::Empty.into();
        assert!(matches!(err, RandomizerError::CatalogLoad(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_no_eligible_items_message() {
        let err = RandomizerError::NoEligibleItems { player_count: 9 };
        assert!(err.is_no_eligible_items());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("9 player"));
    }

    #[test]
    fn test_persistence_write_keeps_item() {
        let err = RandomizerError::PersistenceWrite {
            item: ItemId::from("Drawful"),
            source: StorageError::BackendError("disk full".to_string()),
        };
        assert!(err.is_persistence_write());
        assert!(err.is_retryable());
        assert_eq!(err.picked_item().map(ItemId::as_str), Some("Drawful"));
        assert!(err.to_string().contains("disk full") || err.to_string().contains("Drawful"));
    }

    #[test]
    fn test_from_validation() {
        let err: RandomizerError = ValidationError::ZeroPlayerCount.into();
        assert!(err.is_validation());
        assert!(err.picked_item().is_none());
    }

    #[test]
    fn test_io_storage_is_retryable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only mount");
        let err: RandomizerError = StorageError::Io(io).into();
        assert!(err.is_retryable());
        let err: RandomizerError = StorageError::Corrupt("bad".to_string()).into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_internal() {
        let err = RandomizerError::internal("bad weights");
        assert!(matches!(err, RandomizerError::Internal { .. }));
        assert!(err.to_string().contains("bad weights"));
    }
}
