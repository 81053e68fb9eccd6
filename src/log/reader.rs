//! Value Log Reader
//!
//! Random positional reads against the live log file. The reader holds
//! an open handle; the store drops it whenever a commit replaces the
//! file underneath it.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{DuraError, Result};

use super::Location;

/// Reads exact byte ranges from the value log
pub struct LogReader {
    /// File handle for positional reads
    file: BufReader<File>,
}

impl LogReader {
    /// Open the log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            file: BufReader::new(file),
        })
    }

    /// Read exactly the bytes a Location addresses
    ///
    /// Fails with [`DuraError::Truncated`] if the file ends before
    /// `length` bytes are available: the index and log are out of
    /// step, which is fatal rather than a benign miss.
    pub fn read(&mut self, loc: Location) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(loc.offset))?;

        let mut blob = vec![0u8; loc.length as usize];
        self.file.read_exact(&mut blob).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                DuraError::Truncated {
                    offset: loc.offset,
                    expected: loc.length,
                }
            } else {
                DuraError::Io(e)
            }
        })?;

        Ok(blob)
    }
}
