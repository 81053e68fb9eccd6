//! Commit Protocol
//!
//! Produces a new consistent (value log, index) pair reflecting the
//! union of durable data and the cache overlay, then swaps it into
//! place.
//!
//! ## Two-Phase Rewrite
//! ```text
//! 1. Preload   read every durable value the overlay does not shadow
//! 2. Stage     write fresh log + index to {file}.tmp siblings
//! 3. Swap      live -> .bak, .tmp -> live, delete .bak
//! ```
//! The live files are untouched until the staged pair is complete, so
//! a failure before the swap costs nothing. A failure mid-swap rolls
//! the backups straight back. A crash mid-swap is rolled back the same
//! way at next open by [`recover_interrupted`].
//!
//! Rename is atomic per file, not across the pair, hence the backup
//! envelope around the two promotions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::CacheOverlay;
use crate::codec;
use crate::config::StorePaths;
use crate::error::{DuraError, Result};
use crate::index::Index;
use crate::log::{LogReader, LogWriter};
use crate::progress::{Phase, Progress};

/// Outcome of one successful commit
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitStats {
    /// Entries in the rewritten store
    pub entries_written: u64,
    /// Size of the fresh value log in bytes
    pub bytes_written: u64,
    /// Durable records dropped from the merge because their blob no
    /// longer decoded (each one is also logged as a warning)
    pub corrupt_dropped: u64,
}

/// Merge the overlay with durable data and rewrite the store
///
/// On success returns the fresh index (now describing the live files)
/// and the commit stats. On failure the prior durable state is intact
/// and the overlay is untouched, so the commit can be retried.
pub fn commit<V>(
    paths: &StorePaths,
    fsync: bool,
    index: &Index,
    cache: &CacheOverlay<V>,
    progress: &mut dyn FnMut(Progress),
) -> Result<(Index, CommitStats)>
where
    V: Serialize + DeserializeOwned,
{
    let mut stats = CommitStats::default();

    // Phase 1: preload durable values the overlay does not shadow.
    // Must happen against the *current* log, before the rewrite
    // destroys it.
    let staged = preload(paths, index, cache, &mut stats, progress)?;

    // Overlay wins on collision: staged entries first, cache second.
    let mut merged: BTreeMap<&str, &V> = BTreeMap::new();
    for (key, value) in &staged {
        merged.insert(key, value);
    }
    for (key, value) in cache.iter() {
        merged.insert(key, value);
    }

    // Phase 2: stage the fresh pair next to the live files.
    let fresh = match stage(paths, fsync, &merged, &mut stats, progress) {
        Ok(fresh) => fresh,
        Err(e) => {
            discard_staging(paths);
            return Err(DuraError::Commit(e.to_string()));
        }
    };

    // Phase 3: swap the staged pair into place.
    swap_into_place(paths)?;

    debug!(
        entries = stats.entries_written,
        bytes = stats.bytes_written,
        corrupt_dropped = stats.corrupt_dropped,
        "commit complete"
    );
    Ok((fresh, stats))
}

/// Read every indexed value the overlay does not already hold
///
/// A blob that no longer decodes is logged and dropped from the merge;
/// the stats record the loss. A truncated or failed read aborts the
/// commit outright: it means the index and log disagree, and
/// rewriting from that state would silently shrink the store.
fn preload<V>(
    paths: &StorePaths,
    index: &Index,
    cache: &CacheOverlay<V>,
    stats: &mut CommitStats,
    progress: &mut dyn FnMut(Progress),
) -> Result<BTreeMap<String, V>>
where
    V: DeserializeOwned,
{
    let mut staged = BTreeMap::new();
    let total = index.len();
    if total == 0 {
        return Ok(staged);
    }

    let mut reader = LogReader::open(&paths.log)?;
    for (done, (key, loc)) in index.iter().enumerate() {
        progress(Progress {
            phase: Phase::Preload,
            done: done + 1,
            total,
        });

        if cache.contains(key) {
            continue;
        }

        let blob = reader.read(*loc)?;
        match codec::decode_for_key::<V>(key, &blob) {
            Ok(value) => {
                staged.insert(key.clone(), value);
            }
            Err(DuraError::Corrupt { key, detail }) => {
                warn!(key = %key, detail = %detail, "dropping corrupt record from merge");
                stats.corrupt_dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(staged)
}

/// Write the merged dataset to the staging pair
fn stage<V>(
    paths: &StorePaths,
    fsync: bool,
    merged: &BTreeMap<&str, &V>,
    stats: &mut CommitStats,
    progress: &mut dyn FnMut(Progress),
) -> Result<Index>
where
    V: Serialize,
{
    if let Some(parent) = paths.parent() {
        fs::create_dir_all(parent)?;
    }

    let total = merged.len();
    let mut writer = LogWriter::create(&paths.log_tmp)?;
    let mut fresh = Index::new();

    for (done, (key, value)) in merged.iter().enumerate() {
        progress(Progress {
            phase: Phase::Rewrite,
            done: done + 1,
            total,
        });

        let blob = codec::encode(value)?;
        let loc = writer.append(&blob)?;
        fresh.insert((*key).to_string(), loc);
    }

    stats.entries_written = fresh.len() as u64;
    stats.bytes_written = writer.bytes_written();

    writer.finish(fsync)?;
    fresh.dump(&paths.index_tmp, fsync)?;

    Ok(fresh)
}

/// Promote the staged pair over the live files
///
/// Live files are first moved aside to their `.bak` siblings; any
/// failure after that point restores them before the error surfaces.
fn swap_into_place(paths: &StorePaths) -> Result<()> {
    let had_live = paths.live_exists();

    let swap = || -> std::io::Result<()> {
        if had_live {
            fs::rename(&paths.log, &paths.log_bak)?;
            fs::rename(&paths.index, &paths.index_bak)?;
        } else {
            // A half-created store (one live file without the other)
            // is never readable; clear the strays.
            remove_if_exists(&paths.log)?;
            remove_if_exists(&paths.index)?;
        }

        fs::rename(&paths.log_tmp, &paths.log)?;
        fs::rename(&paths.index_tmp, &paths.index)?;

        if had_live {
            remove_if_exists(&paths.log_bak)?;
            remove_if_exists(&paths.index_bak)?;
        }
        Ok(())
    };

    if let Err(e) = swap() {
        restore_backups(paths);
        discard_staging(paths);
        return Err(DuraError::Commit(format!("swap failed: {}", e)));
    }
    Ok(())
}

/// Roll back an interrupted commit found at open time
///
/// Any `.bak` sibling means a commit died mid-swap: restore the
/// backups over the live paths. Leftover `.tmp` files are staging
/// output that never got promoted; they are discarded either way.
/// Returns true if a rollback happened.
pub fn recover_interrupted(paths: &StorePaths) -> Result<bool> {
    let mut rolled_back = false;

    for (bak, live) in [
        (&paths.log_bak, &paths.log),
        (&paths.index_bak, &paths.index),
    ] {
        if bak.exists() {
            warn!(
                backup = %bak.display(),
                "interrupted commit detected, restoring backup"
            );
            remove_if_exists(live)?;
            fs::rename(bak, live)?;
            rolled_back = true;
        }
    }

    discard_staging(paths);
    Ok(rolled_back)
}

/// Best-effort restore of whatever backups exist (mid-commit rollback)
fn restore_backups(paths: &StorePaths) {
    for (bak, live) in [
        (&paths.log_bak, &paths.log),
        (&paths.index_bak, &paths.index),
    ] {
        if bak.exists() {
            let _ = fs::remove_file(live);
            if let Err(e) = fs::rename(bak, live) {
                warn!(backup = %bak.display(), error = %e, "failed to restore backup");
            }
        }
    }
}

/// Best-effort removal of staging leftovers
fn discard_staging(paths: &StorePaths) {
    let _ = fs::remove_file(&paths.log_tmp);
    let _ = fs::remove_file(&paths.index_tmp);
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
