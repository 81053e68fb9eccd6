//! Configuration for duramap
//!
//! Centralized configuration with sensible defaults, plus the
//! derivation of every on-disk path a store uses from its base path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Value log file suffix
pub const LOG_EXT: &str = ".dmlog";

/// Index side file suffix
pub const INDEX_EXT: &str = ".dmidx";

/// Backup suffix, appended to the live file name during a commit swap
pub const BAK_EXT: &str = ".bak";

/// Staging suffix for the two-phase commit
pub const TMP_EXT: &str = ".tmp";

/// Main configuration for a duramap instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Base path for the store. The value log and index side file are
    /// derived from it:
    ///   {path}.dmlog    (value log)
    ///   {path}.dmidx    (index dump)
    /// Transient `.bak`/`.tmp` siblings appear only mid-commit.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fsync the fresh log and index before swapping them into place.
    /// Disabling trades crash durability of the latest commit for
    /// speed; the swap itself stays ordered either way.
    pub fsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./duramap_data/store"),
            fsync: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The full set of on-disk paths derived from `self.path`
    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.path)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base path for the store files
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Enable or disable fsync at commit time
    pub fn fsync(mut self, fsync: bool) -> Self {
        self.config.fsync = fsync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// On-disk paths for one store, all derived from the base path
#[derive(Debug, Clone)]
pub struct StorePaths {
    /// Live value log
    pub log: PathBuf,
    /// Live index dump
    pub index: PathBuf,
    /// Commit-time backup of the value log
    pub log_bak: PathBuf,
    /// Commit-time backup of the index dump
    pub index_bak: PathBuf,
    /// Staging path for the fresh value log
    pub log_tmp: PathBuf,
    /// Staging path for the fresh index dump
    pub index_tmp: PathBuf,
}

impl StorePaths {
    /// Derive all paths from a base path
    pub fn new(base: &Path) -> Self {
        let log = with_suffix(base, LOG_EXT);
        let index = with_suffix(base, INDEX_EXT);
        Self {
            log_bak: with_suffix(&log, BAK_EXT),
            index_bak: with_suffix(&index, BAK_EXT),
            log_tmp: with_suffix(&log, TMP_EXT),
            index_tmp: with_suffix(&index, TMP_EXT),
            log,
            index,
        }
    }

    /// Directory the store files live in, if the base path has one
    pub fn parent(&self) -> Option<&Path> {
        self.log.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// True if both live files exist (an established store)
    pub fn live_exists(&self) -> bool {
        self.log.exists() && self.index.exists()
    }
}

/// Append a literal suffix to a path without treating it as an
/// extension swap ("data/store" + ".dmlog" -> "data/store.dmlog").
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
