//! Value Log Module
//!
//! Durable, sequential byte storage with random positional reads.
//!
//! ## Responsibilities
//! - Append encoded value blobs at the end of the log
//! - Read back an exact byte range recorded in the index
//! - Detect reads that run past the end of the file
//!
//! ## File Format
//! ```text
//! ┌──────────────┬──────────────┬─────────────┬────────
//! │ Blob 1       │ Blob 2       │ Blob 3      │ ...
//! └──────────────┴──────────────┴─────────────┴────────
//! ```
//! No header, no per-record framing. A blob is only reachable through
//! the `(offset, length)` Location the index recorded when it was
//! appended; a full rewrite invalidates every prior Location.

mod reader;
mod writer;

pub use reader::LogReader;
pub use writer::LogWriter;

use serde::{Deserialize, Serialize};

/// A byte range within the value log
///
/// Serialized in the index dump as a two-element array
/// `[offset, length]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct Location {
    /// Byte offset of the blob's first byte
    pub offset: u64,
    /// Blob length in bytes
    pub length: u64,
}

impl Location {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

impl From<(u64, u64)> for Location {
    fn from((offset, length): (u64, u64)) -> Self {
        Self { offset, length }
    }
}

impl From<Location> for (u64, u64) {
    fn from(loc: Location) -> Self {
        (loc.offset, loc.length)
    }
}
