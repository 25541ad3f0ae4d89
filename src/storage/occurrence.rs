//! The occurrence store: one catalog's counts bound to a backend.

use std::sync::Arc;

use crate::catalog::ItemId;
use crate::error::{RandomizerError, RandomizerResult};
use crate::stats::OccurrenceStats;
use crate::storage::traits::{StatsKey, StatsStore, StorageError};

/// Loads and saves the occurrence stats of one catalog.
///
/// Loading reconciles the stored counts with the catalog: games added since
/// the last save start at zero, games removed from the catalog keep their
/// counts so they come back unchanged if re-added.
#[derive(Clone)]
pub struct OccurrenceStore {
    backend: Arc<dyn StatsStore>,
    key: StatsKey,
}

impl OccurrenceStore {
    /// Binds `backend` to `key`.
    #[must_use]
    pub fn new(backend: Arc<dyn StatsStore>, key: StatsKey) -> Self {
        Self { backend, key }
    }

    /// The key these stats live under.
    #[must_use]
    pub const fn key(&self) -> &StatsKey {
        &self.key
    }

    /// Loads the counts, with an entry for every id in `catalog_ids`.
    ///
    /// Nothing stored yet is not an error: every id starts at zero.
    ///
    /// # Errors
    /// `StatsLoad` if stored data exists but cannot be read. History is
    /// never silently discarded.
    pub fn load<'a>(
        &self,
        catalog_ids: impl IntoIterator<Item = &'a ItemId>,
    ) -> RandomizerResult<OccurrenceStats> {
        let stored = self.backend.load(&self.key).map_err(|source| self.load_error(source))?;
        let stats = match stored {
            Some(mut stats) => {
                let added = stats.reconcile(catalog_ids);
                tracing::debug!(key = %self.key, entries = stats.len(), added, "loaded occurrence stats");
                stats
            }
            None => {
                let stats = OccurrenceStats::zeroed(catalog_ids);
                tracing::debug!(key = %self.key, entries = stats.len(), "no stored stats, starting fresh");
                stats
            }
        };
        Ok(stats)
    }

    /// Overwrites the stored counts with `stats`.
    ///
    /// # Errors
    /// Returns the backend's error unchanged so callers can attach context.
    pub fn save(&self, stats: &OccurrenceStats) -> Result<(), StorageError> {
        self.backend.save(&self.key, stats)
    }

    fn load_error(&self, source: StorageError) -> RandomizerError {
        RandomizerError::StatsLoad {
            key: self.key.to_string(),
            source,
        }
    }
}

impl std::fmt::Debug for OccurrenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccurrenceStore").field("key", &self.key).finish_non_exhaustive()
    }
}
