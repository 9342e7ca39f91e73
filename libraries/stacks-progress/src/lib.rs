//! Stacks - Playback Progress Persistence
//!
//! Durable, keyed storage of playback checkpoints over SQLite:
//! - Upsert keyed by `(item_identifier, filename)`, last-write-wins
//! - Checkpoint creation floor (no records for the first 10 seconds)
//! - Continue-watching / continue-listening queries (incomplete records,
//!   most recently touched first)
//!
//! Album-level audio progress is stored under a reserved marker filename on a
//! normalized 0-100 scale; see `stacks_core::ALBUM_MARKER_FILENAME`.

mod error;
mod store;

pub use error::{Result, StorageError};
pub use store::ProgressStore;

// Shared filtering rule, also usable on in-memory record sets
pub use stacks_core::filter_incomplete;
