//! Per-session record of games already shown.
//!
//! A cycle runs from an empty set until no unshown game fits the requested
//! player count. At that point the engine clears the whole set, for every
//! player count, and starts a new cycle.

use std::collections::BTreeSet;

use crate::catalog::ItemId;

/// Games picked since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    shown: BTreeSet<ItemId>,
}

impl CycleState {
    /// Creates an empty cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` was already shown this cycle.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.shown.contains(id)
    }

    /// Marks `id` as shown. Returns false if it already was.
    pub fn record(&mut self, id: ItemId) -> bool {
        self.shown.insert(id)
    }

    /// Starts a new cycle.
    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Number of games shown this cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Returns true at the start of a cycle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Iterates over shown games in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.shown.iter()
    }
}
