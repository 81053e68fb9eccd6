//! # duramap
//!
//! A disk-backed persistent map with:
//! - Mapping semantics (get/set/contains/delete/iterate) over string keys
//! - A flat append-only value log paired with a wholesale-dumped index
//! - An in-memory overlay batching writes until an explicit commit
//! - A two-phase commit with backup rollback around the rewrite
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DuraMap<V>                            │
//! │            (get / set / delete / keys / sync)               │
//! └────────┬──────────────────┬─────────────────────┬───────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//!   ┌─────────────┐   ┌─────────────┐      ┌───────────────┐
//!   │ CacheOverlay│   │    Index    │      │ Commit        │
//!   │ (pending +  │   │ key → range │      │ (merge, stage,│
//!   │  memoized)  │   │  {p}.dmidx  │      │  swap)        │
//!   └─────────────┘   └──────┬──────┘      └───────┬───────┘
//!                            │                     │
//!                            ▼                     ▼
//!                     ┌─────────────────────────────────┐
//!                     │           Value Log             │
//!                     │     {p}.dmlog (blob blob …)     │
//!                     └─────────────────────────────────┘
//! ```
//!
//! Writes land in the overlay only; reads check the overlay, then the
//! index + value log. A commit merges everything, rewrites both files
//! wholesale, and clears the overlay. Single-process, single-writer by
//! contract.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod cache;
pub mod codec;
pub mod commit;
pub mod index;
pub mod log;
pub mod progress;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use commit::CommitStats;
pub use config::Config;
pub use error::{DuraError, Result};
pub use log::Location;
pub use progress::{Phase, Progress};
pub use store::DuraMap;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of duramap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
