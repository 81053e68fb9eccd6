//! Store Module
//!
//! The public facade composing the index, cache overlay, and value
//! log into one mapping-like surface.
//!
//! ## Responsibilities
//! - Route reads through the overlay, then the index + value log
//! - Land writes in the overlay only (durability comes from `sync`)
//! - Drive the commit protocol and open-time recovery
//!
//! ## Lifecycle
//! ```text
//! open ──► get/set/delete/contains/keys ... ──► sync (any number) ──► close
//! ```
//! A key is visible if it is in the overlay or the index; on
//! collision the overlay wins. `len` deliberately counts only durable
//! (indexed) entries, so a pending `set` does not change it until the
//! next commit.
//!
//! One instance exclusively owns its backing files. Nothing prevents a
//! second instance from opening the same path; keeping writers unique
//! is the caller's job.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::CacheOverlay;
use crate::codec;
use crate::commit::{self, CommitStats};
use crate::config::{Config, StorePaths};
use crate::error::Result;
use crate::index::Index;
use crate::log::LogReader;
use crate::progress::{Phase, Progress};

/// A disk-backed persistent map with string keys
pub struct DuraMap<V> {
    /// Store configuration
    config: Config,

    /// On-disk paths derived from the base path
    paths: StorePaths,

    /// Durable key → Location mapping, loaded wholesale at open
    index: Index,

    /// Pending writes and memoized reads
    cache: CacheOverlay<V>,

    /// Open handle on the live value log; dropped whenever a commit
    /// replaces the file underneath it
    reader: Option<LogReader>,
}

impl<V> DuraMap<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Open a store at the given base path with default settings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(Config::builder().path(path).build())
    }

    /// Open a store with explicit configuration
    ///
    /// Rolls back any commit that died mid-swap, then loads the index
    /// side file fully into memory. The value log itself is not read
    /// here; values load lazily per key.
    pub fn open_with(config: Config) -> Result<Self> {
        let paths = config.store_paths();
        commit::recover_interrupted(&paths)?;

        let index = if paths.live_exists() {
            Index::load(&paths.index)?
        } else {
            Index::new()
        };

        debug!(path = %config.path.display(), entries = index.len(), "store opened");
        Ok(Self {
            config,
            paths,
            index,
            cache: CacheOverlay::new(),
            reader: None,
        })
    }

    // =========================================================================
    // Lookup Path
    // =========================================================================

    /// Get a value by key
    ///
    /// Search order: overlay first, then index + value log, promoting
    /// the decoded value into the overlay for repeat access.
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key present
    /// - `Ok(None)`: key never written (or deleted)
    /// - `Err(Corrupt)`: a durable record exists but will not decode
    /// - `Err(Truncated)`: the index addresses bytes the log lacks
    pub fn get(&mut self, key: &str) -> Result<Option<&V>> {
        if !self.cache.contains(key) {
            let Some(loc) = self.index.get(key) else {
                return Ok(None);
            };

            let blob = self.reader()?.read(loc)?;
            let value = codec::decode_for_key(key, &blob).map_err(|e| {
                warn!(key = %key, error = %e, "stored record failed to decode");
                e
            })?;
            self.cache.insert(key.to_string(), value);
        }

        Ok(self.cache.get(key))
    }

    /// Load every indexed value into the overlay
    ///
    /// Materializes the whole dataset in memory; cost is proportional
    /// to total data size. Errors from individual records propagate.
    pub fn fullcache(&mut self) -> Result<()> {
        self.fullcache_with_progress(&mut |_| {})
    }

    /// `fullcache` with a progress callback (one `Warm` tick per key)
    pub fn fullcache_with_progress(
        &mut self,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<()> {
        let keys: Vec<String> = self.index.keys().map(str::to_string).collect();
        let total = keys.len();

        for (done, key) in keys.iter().enumerate() {
            progress(Progress {
                phase: Phase::Warm,
                done: done + 1,
                total,
            });
            self.get(key)?;
        }
        Ok(())
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Merge the overlay with durable data and rewrite the store
    ///
    /// After a successful sync every visible entry is durable and the
    /// overlay is empty. On failure the prior durable state is intact
    /// and the overlay still holds the pending writes.
    pub fn sync(&mut self) -> Result<CommitStats> {
        self.sync_with_progress(&mut |_| {})
    }

    /// `sync` with a progress callback (`Preload` then `Rewrite` ticks)
    pub fn sync_with_progress(
        &mut self,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<CommitStats> {
        let (fresh, stats) = commit::commit(
            &self.paths,
            self.config.fsync,
            &self.index,
            &self.cache,
            progress,
        )?;

        self.index = fresh;
        self.cache.clear();
        // The live log was just replaced; a held handle would keep
        // reading the old inode.
        self.reader = None;

        Ok(stats)
    }

    /// Commit pending writes and consume the store
    pub fn close(mut self) -> Result<CommitStats> {
        self.sync()
    }

    fn reader(&mut self) -> Result<&mut LogReader> {
        if self.reader.is_none() {
            self.reader = Some(LogReader::open(&self.paths.log)?);
        }
        Ok(self.reader.as_mut().unwrap())
    }
}

impl<V> DuraMap<V> {
    // =========================================================================
    // Mutation & Inspection (no I/O)
    // =========================================================================

    /// Store a value in the overlay; durable after the next `sync`
    ///
    /// Writing the same key again before a commit simply replaces the
    /// pending value.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.cache.insert(key.into(), value);
    }

    /// Bulk `set` from any (key, value) source
    pub fn update(&mut self, entries: impl IntoIterator<Item = (String, V)>) {
        self.cache.extend(entries);
    }

    /// True if the key is visible (overlay or index)
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains(key) || self.index.contains(key)
    }

    /// Number of durable (indexed) entries
    ///
    /// Pending writes are not counted until they commit.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no entries are durable
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Remove a key from both the overlay and the index
    ///
    /// Returns whether the key was present anywhere; deleting a
    /// missing key is a no-op. Log bytes of a deleted entry linger
    /// until the next rewrite simply stops copying them.
    pub fn delete(&mut self, key: &str) -> bool {
        let in_index = self.index.remove(key);
        let in_cache = self.cache.remove(key);
        in_index || in_cache
    }

    /// Durable keys in index order
    ///
    /// Pending overlay-only keys are not yielded until they commit.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys()
    }

    /// Drop the overlay; pending uncommitted writes are lost
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Clear index and overlay in memory only
    ///
    /// The on-disk state survives until the next `sync` overwrites it.
    pub fn renew(&mut self) {
        self.index.clear();
        self.cache.clear();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Base path this store is bound to
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// The configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of entries currently in the overlay
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
