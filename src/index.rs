//! Index Module
//!
//! The key → Location mapping, fully materialized in memory and
//! persisted as a single wholesale dump. There is no incremental
//! persistence: every commit rewrites the full index together with the
//! full value log.
//!
//! ## Side File Format
//! One JSON object mapping each key to its byte range:
//! ```text
//! {"alpha":[0,17],"beta":[17,9]}
//! ```
//! Iteration order is key-sorted (BTreeMap), which is also the order
//! the commit rewrite lays blobs out in, so the dump reads back in the
//! same order it was written.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{DuraError, Result};
use crate::log::Location;

/// In-memory key → Location mapping with wholesale load/dump
#[derive(Debug, Default)]
pub struct Index {
    entries: BTreeMap<String, Location>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from its side file
    ///
    /// A missing file yields an empty index (fresh store). A file that
    /// exists but does not parse is fatal: without the index the
    /// dataset is unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let file = File::open(path)?;
        let entries: BTreeMap<String, Location> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DuraError::IndexLoad(format!("{}: {}", path.display(), e)))?;

        Ok(Self { entries })
    }

    /// Dump the whole mapping to the side file in one write
    pub fn dump(&self, path: &Path, fsync: bool) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, &self.entries)
            .map_err(|e| DuraError::Commit(format!("index dump: {}", e)))?;
        writer.flush()?;

        if fsync {
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    // =========================================================================
    // Mapping Operations
    // =========================================================================

    pub fn get(&self, key: &str) -> Option<Location> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: String, loc: Location) {
        self.entries.insert(key, loc);
    }

    /// Remove a key; absent keys are a no-op
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys in index order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// (key, Location) pairs in index order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Location> {
        self.entries.iter()
    }
}
