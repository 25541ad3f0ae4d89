//! Persistent storage backend.
//!
//! Durable stats on the local filesystem:
//! - one JSON file per catalog key
//! - write-to-temp-then-rename so a crash never truncates counts
//! - optional fsync of the file and directory on every save
//!
//! One process writes a given key at a time; the backend does not
//! coordinate concurrent writers.
//!
//! ```text
//! <data_dir>/
//! ├── boardgames_stats.json
//! └── jackbox_games_stats.json
//! ```

mod file_store;

pub use file_store::FileStatsStore;

use crate::config::StorageConfig;
use crate::error::RandomizerResult;

/// Open the stats directory described by `config`.
///
/// # Errors
/// - `Validation` if the configuration is invalid
/// - `Storage` if the directory cannot be created
///
/// # Example
/// ```rust,ignore
/// use game_randomizer::{open_stats_dir, StorageConfig};
///
/// let store = open_stats_dir(&StorageConfig::from_env()?)?;
/// ```
pub fn open_stats_dir(config: &StorageConfig) -> RandomizerResult<FileStatsStore> {
    config.validate()?;
    FileStatsStore::open(&config.data_dir, config.sync_on_write).map_err(Into::into)
}
