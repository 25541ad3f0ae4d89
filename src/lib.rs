//! # Game Randomizer
//!
//! Picks a game from a weighted catalog for a given number of players, and
//! remembers how often each game came up so later picks lean towards the
//! ones that have been neglected.
//!
//! ## Core Concepts
//!
//! - **Catalog**: the fixed set of games, each with a minimum player count
//!   and a base weight
//! - **OccurrenceStats**: durable per-game pick counts
//! - **Cycle**: games already shown this session; they sit out until every
//!   game that fits the player count has been shown
//! - **Randomizer**: the engine tying these together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use game_randomizer::{open_stats_dir, Catalog, OccurrenceStore, Randomizer, StatsKey, StorageConfig};
//!
//! let catalog = Catalog::from_path("assets/jackbox_games.json")?;
//! let backend = open_stats_dir(&StorageConfig::from_env()?)?;
//! let store = OccurrenceStore::new(Arc::new(backend), StatsKey::new("jackbox_games")?);
//! let mut randomizer = Randomizer::new(catalog, store)?;
//!
//! let pick = randomizer.pick(4, None)?;
//! println!("{} ({:.0}% chance)", pick.id, pick.probability * 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod stats;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use catalog::{Catalog, CatalogItem, ItemId, Settings, MAX_WEIGHT};
pub use config::StorageConfig;
pub use engine::{selection_weight, Candidate, Pick, Randomizer};
pub use error::{CatalogError, RandomizerError, RandomizerResult, ValidationError};
pub use stats::OccurrenceStats;
pub use storage::{
    open_stats_dir, FileStatsStore, InMemoryStatsStore, OccurrenceStore, StatsKey, StatsStore,
    StorageError,
};
