//! In-memory storage backend.
//!
//! This module provides a thread-safe in-memory implementation of
//! [`StatsStore`]. It is intended for embedded usage and tests: it counts
//! writes and can be told to fail them, so callers can check persistence
//! behaviour without touching the filesystem.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::stats::OccurrenceStats;
use crate::storage::traits::{StatsKey, StatsStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// Stats kept in a map for the life of the value.
#[derive(Debug, Default)]
pub struct InMemoryStatsStore {
    by_key: RwLock<HashMap<StatsKey, OccurrenceStats>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryStatsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `stats` under `key`.
    #[must_use]
    pub fn with_stats(key: StatsKey, stats: OccurrenceStats) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.by_key.write() {
            guard.insert(key, stats);
        }
        store
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every following `save` fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns what is currently stored under `key`.
    #[must_use]
    pub fn snapshot(&self, key: &StatsKey) -> Option<OccurrenceStats> {
        self.by_key.read().ok()?.get(key).cloned()
    }
}

impl StatsStore for InMemoryStatsStore {
    fn load(&self, key: &StatsKey) -> Result<Option<OccurrenceStats>, StorageError> {
        let guard = self.by_key.read().map_err(|_| lock_err("stats.load"))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &StatsKey, stats: &OccurrenceStats) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(format!(
                "write rejected for '{key}'"
            )));
        }
        let mut guard = self.by_key.write().map_err(|_| lock_err("stats.save"))?;
        guard.insert(key.clone(), stats.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
