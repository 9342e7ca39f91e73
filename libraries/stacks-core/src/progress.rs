//! Playback progress records
//!
//! A progress record is one persisted checkpoint: where playback last stood
//! for a given file (or for a whole album, via the marker filename).

use crate::media::MediaKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved sentinel filename for album-level progress records.
///
/// Multi-track audio progress is keyed against this marker instead of any
/// real track filename, so a single record spans the whole album. Marker
/// records carry `current_time`/`duration` on a normalized 0-100 scale;
/// the precise in-track resume point travels in `track_index`,
/// `track_filename`, and `track_current_time` (real seconds).
pub const ALBUM_MARKER_FILENAME: &str = "__album_playback__";

/// Fraction of the duration at which an item counts as finished.
pub const COMPLETION_THRESHOLD: f64 = 0.95;

/// Positions earlier than this many seconds are never persisted.
///
/// Keeps accidental taps and immediate back-outs from littering the
/// continue-watching shelf.
pub const MIN_CHECKPOINT_SECS: f64 = 10.0;

/// A persisted playback checkpoint.
///
/// Identity is `(item_identifier, filename)`: saving a record with the same
/// key replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProgress {
    /// Remote content identifier
    pub item_identifier: String,

    /// Media file within the item, or [`ALBUM_MARKER_FILENAME`]
    pub filename: String,

    /// Seconds into the file; 0-100 for album marker records
    pub current_time: f64,

    /// Total seconds; fixed at 100.0 for album marker records
    pub duration: f64,

    /// Last checkpoint timestamp; drives continue-watching ordering
    pub last_watched: DateTime<Utc>,

    /// Display title (optional)
    pub title: Option<String>,

    /// Video vs audio
    pub media_kind: MediaKind,

    /// Thumbnail URL captured at checkpoint time (optional)
    pub image_url: Option<String>,

    /// Album entries only: index of the track playback stood in
    pub track_index: Option<usize>,

    /// Album entries only: filename of that track
    pub track_filename: Option<String>,

    /// Album entries only: seconds into that track
    pub track_current_time: Option<f64>,
}

impl PlaybackProgress {
    /// Fraction complete, clamped to `[0, 1]`. Zero when duration is unknown.
    pub fn progress_percentage(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.current_time / self.duration).clamp(0.0, 1.0)
    }

    /// Whether playback has effectively finished (>= 95% through).
    pub fn is_complete(&self) -> bool {
        self.progress_percentage() >= COMPLETION_THRESHOLD
    }

    /// Seconds left to play. Zero when duration is unknown.
    pub fn remaining_seconds(&self) -> f64 {
        (self.duration - self.current_time).max(0.0)
    }

    /// Whether this record tracks album-level progress.
    pub fn is_album_entry(&self) -> bool {
        self.filename == ALBUM_MARKER_FILENAME
    }

    /// Upsert key.
    pub fn key(&self) -> (&str, &str) {
        (&self.item_identifier, &self.filename)
    }
}

/// Drop completed records and, when a kind is given, records of other kinds.
///
/// Shared by the store queries and by UI sections that already hold records
/// in memory. Order of the input is preserved.
pub fn filter_incomplete(
    records: Vec<PlaybackProgress>,
    kind: Option<MediaKind>,
) -> Vec<PlaybackProgress> {
    records
        .into_iter()
        .filter(|record| !record.is_complete())
        .filter(|record| kind.map_or(true, |k| record.media_kind == k))
        .collect()
}
