//! Playback and scrubber events
//!
//! Event-based communication for UI synchronization. The scrubber's
//! four-phase lifecycle (begin, value changes, end, finish) is carried as
//! discrete events; consumers rely on `FinishScrubbing` arriving strictly
//! after momentum has settled, not merely after the gesture ends.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the scrubber state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScrubberEvent {
    /// A scrub session opened; consumers pause playback
    BeginScrubbing,

    /// Displayed value changed
    ValueChanged {
        /// New value, already clamped
        value: f64,
        /// Animation duration for the change, when animated
        animation: Option<Duration>,
    },

    /// Gesture phase over; momentum may still be carrying the value
    EndScrubbing,

    /// Momentum settled and the session closed; consumers perform the
    /// final seek and resume playback on this event alone
    FinishScrubbing,

    /// Tap on the control; consumers redirect focus, not position
    Tap,
}

/// Events emitted by a playback session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Playback moved to a different track
    TrackChanged {
        /// Identity of the new track
        track_id: String,
        /// Identity of the previous track, if any
        previous_track_id: Option<String>,
    },

    /// Current track reached its natural end
    TrackFinished {
        /// Identity of the finished track
        track_id: String,
    },

    /// Periodic playback clock update
    PositionUpdate {
        /// Seconds into the current file
        position_secs: f64,
        /// Total seconds, when known
        duration_secs: Option<f64>,
    },

    /// Last track finished with repeat off; album progress was cleared
    QueueFinished,

    /// Non-fatal error surfaced for presentation
    Error {
        /// Human-readable message
        message: String,
    },
}
