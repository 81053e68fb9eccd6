//! Error types for duramap
//!
//! Provides a unified error type for all operations.
//!
//! Key absence is not an error: lookups report it as `Ok(None)` and
//! deleting a missing key is a no-op. The variants here cover the
//! conditions a caller may need to react to individually, in
//! particular `Corrupt` (a stored blob exists but cannot be decoded)
//! versus a plain miss.

use thiserror::Error;

/// Result type alias using DuraError
pub type Result<T> = std::result::Result<T, DuraError>;

/// Unified error type for duramap operations
#[derive(Debug, Error)]
pub enum DuraError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Value Log Errors
    // -------------------------------------------------------------------------
    /// The index addressed bytes past the end of the value log. The
    /// log and index are out of step; treat the store as damaged.
    #[error("truncated read at offset {offset}: wanted {expected} bytes")]
    Truncated { offset: u64, expected: u64 },

    /// A stored blob was read back but could not be decoded.
    #[error("corrupt record for key '{key}': {detail}")]
    Corrupt { key: String, detail: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    /// The index side file exists but cannot be parsed. Fatal: without
    /// the index the dataset is unreadable.
    #[error("index load failed: {0}")]
    IndexLoad(String),

    // -------------------------------------------------------------------------
    // Commit Errors
    // -------------------------------------------------------------------------
    /// The commit rewrite failed. The prior durable state was left (or
    /// restored) intact; the in-memory cache still holds the pending
    /// writes.
    #[error("commit failed: {0}")]
    Commit(String),
}
