//! Error types for the progress store.

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored row could not be interpreted
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
