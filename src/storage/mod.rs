//! Storage for occurrence stats.
//!
//! The [`StatsStore`] trait is the seam between the selection engine and
//! wherever counts live. Two backends are provided: an in-memory one for
//! tests and embedding, and a JSON-file one for real use.

mod memory;
mod occurrence;
pub mod persistent;
mod traits;

pub use memory::InMemoryStatsStore;
pub use occurrence::OccurrenceStore;
pub use persistent::{open_stats_dir, FileStatsStore};
pub use traits::{StatsKey, StatsStore, StorageError};
