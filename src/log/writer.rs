//! Value Log Writer
//!
//! Appends blobs to a fresh log file during a commit rewrite. The
//! writer always starts from an empty file: the commit protocol never
//! extends an existing log in place.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

use super::Location;

/// Writes blobs to the value log, handing back their Locations
pub struct LogWriter {
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Offset the next blob will land at
    offset: u64,
}

impl LogWriter {
    /// Create a fresh log file, truncating any prior content
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            offset: 0,
        })
    }

    /// Append one blob, returning the range it occupies
    pub fn append(&mut self, blob: &[u8]) -> Result<Location> {
        self.writer.write_all(blob)?;

        let loc = Location::new(self.offset, blob.len() as u64);
        self.offset += blob.len() as u64;
        Ok(loc)
    }

    /// Total bytes appended so far
    pub fn bytes_written(&self) -> u64 {
        self.offset
    }

    /// Flush buffered data, optionally fsyncing it to disk
    pub fn finish(self, fsync: bool) -> Result<()> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;

        if fsync {
            file.sync_all()?;
        }
        Ok(())
    }
}
