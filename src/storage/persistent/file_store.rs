//! JSON file backend for occurrence stats.
//!
//! Each key is stored as `<dir>/<key>_stats.json`, a flat JSON object of
//! game identifier to count. Writes go to a temporary file that is renamed
//! over the old one, so a crash mid-write leaves the previous counts intact.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::stats::OccurrenceStats;
use crate::storage::traits::{StatsKey, StatsStore, StorageError};

const STATS_SUFFIX: &str = "_stats.json";
const TEMP_SUFFIX: &str = "_stats.json.tmp";

/// Stats persisted as one JSON file per key.
#[derive(Debug)]
pub struct FileStatsStore {
    dir: PathBuf,
    sync_on_write: bool,
}

impl FileStatsStore {
    /// Opens (creating if needed) a stats directory.
    ///
    /// Leftover temporary files from interrupted stats writes are removed;
    /// nothing else in the directory is touched.
    ///
    /// # Errors
    /// `Io` if the directory cannot be created or read
    pub fn open(dir: impl AsRef<Path>, sync_on_write: bool) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let store = Self { dir, sync_on_write };
        store.remove_temp_files()?;
        tracing::debug!(dir = %store.dir.display(), sync_on_write, "opened stats directory");
        Ok(store)
    }

    /// Directory holding the stats files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the stats for `key`.
    #[must_use]
    pub fn path_for(&self, key: &StatsKey) -> PathBuf {
        self.dir.join(format!("{key}{STATS_SUFFIX}"))
    }

    fn remove_temp_files(&self) -> Result<(), StorageError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_stats_temp = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.len() > TEMP_SUFFIX.len() && name.ends_with(TEMP_SUFFIX));
            if is_stats_temp && path.is_file() {
                tracing::debug!(path = %path.display(), "removing interrupted stats write");
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let result = (|| {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(bytes)?;
            writer.flush()?;
            if self.sync_on_write {
                writer.get_ref().sync_all()?;
            }
            fs::rename(&temp_path, path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
            return result;
        }

        if self.sync_on_write {
            self.sync_dir()?;
        }
        Ok(())
    }

    /// Persists the rename itself.
    #[cfg(unix)]
    fn sync_dir(&self) -> std::io::Result<()> {
        fs::File::open(&self.dir)?.sync_all()
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn sync_dir(&self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self, key: &StatsKey) -> Result<Option<OccurrenceStats>, StorageError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };
        let stats = serde_json::from_str(&text)
            .map_err(|e| StorageError::Corrupt(format!("{}: {e}", path.display())))?;
        Ok(Some(stats))
    }

    fn save(&self, key: &StatsKey, stats: &OccurrenceStats) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(stats)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        self.write_atomic(&path, &bytes)?;
        tracing::trace!(path = %path.display(), entries = stats.len(), "stats written");
        Ok(())
    }
}
