//! Selection engine.
//!
//! A [`Randomizer`] owns one catalog, its occurrence counts and the cycle of
//! games already shown this session. Every [`Randomizer::pick`]:
//!
//! 1. takes the largest occurrence count across *all* stored games
//! 2. keeps games that fit the player count, were not shown this cycle and
//!    are not the excluded game, weighting each by
//!    `catalog_weight * (max + 1 - occurrences)`
//! 3. if that leaves nothing while the cycle is non-empty, clears the cycle
//!    and filters again
//! 4. fails with `NoEligibleItems` if no game fits the player count at all
//! 5. draws one game by weight, bumps its count, records it in the cycle and
//!    saves the counts

mod cycle;
mod weights;

pub use cycle::CycleState;
pub use weights::{selection_weight, Candidate};

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::catalog::{Catalog, CatalogItem, ItemId, Settings};
use crate::error::{RandomizerError, RandomizerResult, ValidationError};
use crate::stats::OccurrenceStats;
use crate::storage::OccurrenceStore;

/// Result of a successful pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    /// The chosen game.
    pub id: ItemId,
    /// Its catalog entry.
    pub item: CatalogItem,
    /// Times picked, including this pick.
    pub occurrences: u64,
    /// Weight it was drawn with.
    pub weight: f64,
    /// Chance it had of being drawn.
    pub probability: f64,
    /// Whether this pick started a new cycle.
    pub cycle_reset: bool,
}

/// Candidates for a pick, plus whether taking them requires a cycle reset.
#[derive(Debug)]
struct Plan {
    candidates: Vec<Candidate>,
    reset_cycle: bool,
}

/// Picks games from a catalog, steering away from ones shown too often.
///
/// Single-threaded by design: `pick` needs `&mut self` and one store must
/// have only one randomizer writing to it.
pub struct Randomizer<R = ChaCha8Rng> {
    catalog: Catalog,
    store: OccurrenceStore,
    stats: OccurrenceStats,
    cycle: CycleState,
    rng: R,
}

impl Randomizer<ChaCha8Rng> {
    /// Creates a randomizer seeded from OS entropy.
    ///
    /// # Errors
    /// `StatsLoad` if stored counts exist but cannot be read.
    pub fn new(catalog: Catalog, store: OccurrenceStore) -> RandomizerResult<Self> {
        Self::with_rng(catalog, store, ChaCha8Rng::from_entropy())
    }

    /// Creates a randomizer whose draws are reproducible from `seed`.
    ///
    /// # Errors
    /// `StatsLoad` if stored counts exist but cannot be read.
    pub fn seeded(catalog: Catalog, store: OccurrenceStore, seed: u64) -> RandomizerResult<Self> {
        Self::with_rng(catalog, store, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Randomizer<R> {
    /// Creates a randomizer drawing from `rng`, loading counts from `store`.
    ///
    /// # Errors
    /// `StatsLoad` if stored counts exist but cannot be read.
    pub fn with_rng(catalog: Catalog, store: OccurrenceStore, rng: R) -> RandomizerResult<Self> {
        let stats = store.load(catalog.ids())?;
        Ok(Self {
            catalog,
            store,
            stats,
            cycle: CycleState::new(),
            rng,
        })
    }

    /// Picks a game for `player_count` players.
    ///
    /// `exclude` is usually the game shown just before; it is skipped unless
    /// it is the only game that fits.
    ///
    /// # Errors
    /// - `Validation` if `player_count` is 0
    /// - `NoEligibleItems` if no game supports `player_count`
    /// - `PersistenceWrite` if the pick was made but saving the counts
    ///   failed; in-memory counts already include the pick and
    ///   [`Randomizer::save_stats`] can retry the write
    pub fn pick(&mut self, player_count: u32, exclude: Option<&str>) -> RandomizerResult<Pick> {
        let Plan {
            mut candidates,
            reset_cycle,
        } = self.plan(player_count, exclude)?;

        let index = weights::draw(&candidates, &mut self.rng)?;
        let chosen = candidates.swap_remove(index);
        let item = self
            .catalog
            .get(chosen.id.as_str())
            .cloned()
            .ok_or_else(|| RandomizerError::internal(format!("picked unknown game '{}'", chosen.id)))?;

        if reset_cycle {
            tracing::debug!(shown = self.cycle.len(), player_count, "cycle exhausted, starting over");
            self.cycle.clear();
        }

        let occurrences = self.stats.increment(&chosen.id);
        self.cycle.record(chosen.id.clone());
        tracing::debug!(
            game = %chosen.id,
            player_count,
            occurrences,
            weight = chosen.weight,
            probability = chosen.probability,
            "picked game"
        );

        if let Err(source) = self.store.save(&self.stats) {
            tracing::warn!(game = %chosen.id, error = %source, "failed to save occurrence stats");
            return Err(RandomizerError::PersistenceWrite {
                item: chosen.id,
                source,
            });
        }

        Ok(Pick {
            id: chosen.id,
            item,
            occurrences,
            weight: chosen.weight,
            probability: chosen.probability,
            cycle_reset: reset_cycle,
        })
    }

    /// Lists what the next `pick` with these arguments would choose from.
    ///
    /// Nothing is changed. If the next pick would start a new cycle, the
    /// list is the post-reset one.
    ///
    /// # Errors
    /// As [`Randomizer::pick`], minus the persistence error.
    pub fn candidates(&self, player_count: u32, exclude: Option<&str>) -> RandomizerResult<Vec<Candidate>> {
        self.plan(player_count, exclude).map(|plan| plan.candidates)
    }

    /// Writes the current counts again.
    ///
    /// Saving overwrites, so calling this after a failed pick save, or any
    /// number of times, never double-counts.
    ///
    /// # Errors
    /// `SaveFailed` if the backend rejects the write.
    pub fn save_stats(&self) -> RandomizerResult<()> {
        self.store.save(&self.stats).map_err(|source| RandomizerError::SaveFailed {
            key: self.store.key().to_string(),
            source,
        })
    }

    /// Copy of the current occurrence counts.
    #[must_use]
    pub fn view_stats(&self) -> OccurrenceStats {
        self.stats.clone()
    }

    /// Copy of every catalog entry.
    #[must_use]
    pub fn catalog_items(&self) -> BTreeMap<ItemId, CatalogItem> {
        self.catalog.items().clone()
    }

    /// Copy of the catalog settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.catalog.settings().clone()
    }

    /// The catalog this randomizer picks from.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of games shown in the current cycle.
    #[must_use]
    pub fn shown_this_cycle(&self) -> usize {
        self.cycle.len()
    }

    fn plan(&self, player_count: u32, exclude: Option<&str>) -> RandomizerResult<Plan> {
        if player_count == 0 {
            return Err(ValidationError::ZeroPlayerCount.into());
        }

        let max_occurrence = self.stats.max_occurrence();
        let build = |skip_shown: bool, skip_excluded: bool| -> Vec<Candidate> {
            let mut candidates: Vec<Candidate> = self
                .catalog
                .iter()
                .filter(|(_, item)| item.supports(player_count))
                .filter(|(id, _)| !(skip_shown && self.cycle.contains(id.as_str())))
                .filter(|(id, _)| !(skip_excluded && exclude == Some(id.as_str())))
                .map(|(id, item)| {
                    let occurrences = self.stats.get(id.as_str());
                    Candidate {
                        id: id.clone(),
                        catalog_weight: item.weight,
                        occurrences,
                        weight: selection_weight(item.weight, occurrences, max_occurrence),
                        probability: 0.0,
                    }
                })
                .collect();
            weights::normalize(&mut candidates);
            candidates
        };

        let mut candidates = build(true, true);
        let mut reset_cycle = false;

        if candidates.is_empty() && !self.cycle.is_empty() {
            reset_cycle = true;
            candidates = build(false, true);
        }

        // The excluded game is the only one left that fits: show it again
        // rather than report the player count as unsupported.
        if candidates.is_empty() && exclude.is_some() {
            candidates = build(false, false);
        }

        if candidates.is_empty() {
            return Err(RandomizerError::NoEligibleItems { player_count });
        }

        Ok(Plan {
            candidates,
            reset_cycle,
        })
    }
}

impl<R> std::fmt::Debug for Randomizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Randomizer")
            .field("games", &self.catalog.len())
            .field("store", &self.store)
            .field("shown_this_cycle", &self.cycle.len())
            .finish_non_exhaustive()
    }
}
