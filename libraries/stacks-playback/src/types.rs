//! Core types for playback orchestration

use serde::{Deserialize, Serialize};
use stacks_core::{MediaKind, MIN_CHECKPOINT_SECS};
use std::time::Duration;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the entire queue
    All,

    /// Replay the current track
    One,
}

impl RepeatMode {
    /// Next mode in the cycle: off, all, one, off.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Item-level context a session plays within.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionItem {
    /// Remote content identifier
    pub identifier: String,

    /// Display title
    pub title: Option<String>,

    /// Video vs audio
    pub media_kind: MediaKind,

    /// Thumbnail URL captured for the continue-watching shelf
    pub image_url: Option<String>,
}

/// Timer cadence and checkpoint thresholds for a playback session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Cadence of playback-clock pushes into the scrubber (default: 500ms)
    pub position_tick: Duration,

    /// Cadence of background checkpoint saves (default: 10s)
    pub checkpoint_interval: Duration,

    /// Cadence of scrubber deceleration integration (default: ~60Hz)
    pub deceleration_tick: Duration,

    /// Positions earlier than this are not checkpointed (default: 10s)
    pub min_checkpoint_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            position_tick: Duration::from_millis(500),
            checkpoint_interval: Duration::from_secs(10),
            deceleration_tick: Duration::from_millis(16),
            min_checkpoint_secs: MIN_CHECKPOINT_SECS,
        }
    }
}
