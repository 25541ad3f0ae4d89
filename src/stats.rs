//! Occurrence counts.
//!
//! `OccurrenceStats` records how many times each game has been picked. It is
//! serialized as a flat JSON object of identifier to count, which is also the
//! on-disk format of the file backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;

/// How many times each game has been picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceStats(BTreeMap<ItemId, u64>);

impl OccurrenceStats {
    /// Creates an empty set of counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates counts with every given identifier at zero.
    #[must_use]
    pub fn zeroed<'a>(ids: impl IntoIterator<Item = &'a ItemId>) -> Self {
        Self(ids.into_iter().map(|id| (id.clone(), 0)).collect())
    }

    /// Adds a zero entry for every identifier not already present.
    ///
    /// Existing entries, including ones for identifiers that are not in
    /// `ids`, are left untouched. Returns how many entries were added.
    pub fn reconcile<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.0.contains_key(id) {
                self.0.insert(id.clone(), 0);
                added += 1;
            }
        }
        added
    }

    /// Returns a copy with `id`'s count raised by one.
    #[must_use]
    pub fn incremented(&self, id: &ItemId) -> Self {
        let mut next = self.clone();
        next.increment(id);
        next
    }

    /// Raises `id`'s count by one in place and returns the new count.
    ///
    /// An identifier without an entry starts from zero.
    pub fn increment(&mut self, id: &ItemId) -> u64 {
        let count = self.0.entry(id.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Count for `id`, zero when absent.
    #[must_use]
    pub fn get(&self, id: &str) -> u64 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Largest count across every entry, zero when empty.
    #[must_use]
    pub fn max_occurrence(&self) -> u64 {
        self.0.values().copied().max().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }

    /// Returns true if `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Iterates over entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u64)> {
        self.0.iter().map(|(id, n)| (id, *n))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ItemId, u64)> for OccurrenceStats {
    fn from_iter<I: IntoIterator<Item = (ItemId, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
