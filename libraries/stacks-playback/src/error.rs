//! Error types for playback orchestration

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No media is currently bound to the session
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Network-bound setup failed (already retried per policy)
    #[error(transparent)]
    Client(#[from] stacks_client::ClientError),

    /// Progress store failed
    #[error(transparent)]
    Storage(#[from] stacks_progress::StorageError),

    /// Platform player reported a failure
    #[error("Player error: {0}")]
    Player(String),

    /// Seek target outside the playable range
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
