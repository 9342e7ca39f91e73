//! Track queue with cursor navigation
//!
//! Ordered track list with a current-index cursor, shuffle (current track
//! pinned first so playback doesn't jump), and repeat modes. Album-level
//! progress is reported on a normalized 0-100 scale spanning the whole
//! queue, independent of individual track durations.

use crate::types::RepeatMode;
use rand::seq::SliceRandom;
use rand::thread_rng;
use stacks_core::AudioTrack;

/// Album-level position derived from the queue cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumPosition {
    /// Progress through the whole queue on a 0-100 scale
    pub normalized: f64,

    /// Cursor index of the current track
    pub track_index: usize,

    /// Filename of the current track
    pub track_filename: String,
}

/// Ordered track queue for album playback.
///
/// Invariant: `current_index` is a valid index whenever the queue is
/// non-empty; an empty queue has no current track.
#[derive(Debug, Clone)]
pub struct QueueManager {
    /// Active order (shuffled copy when shuffle is on)
    tracks: Vec<AudioTrack>,

    /// Original order, retained for un-shuffle
    original_order: Vec<AudioTrack>,

    /// Cursor into the active order
    current_index: usize,

    /// Whether the active order is shuffled
    is_shuffled: bool,

    /// Boundary behavior for next/previous
    repeat_mode: RepeatMode,
}

impl QueueManager {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            original_order: Vec::new(),
            current_index: 0,
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
        }
    }

    /// Replace the queue. Resets shuffle; `start_at` is clamped into range.
    pub fn set_queue(&mut self, tracks: Vec<AudioTrack>, start_at: usize) {
        self.current_index = if tracks.is_empty() {
            0
        } else {
            start_at.min(tracks.len() - 1)
        };
        self.original_order.clone_from(&tracks);
        self.tracks = tracks;
        self.is_shuffled = false;
    }

    /// Current track, if the queue is non-empty.
    pub fn current(&self) -> Option<&AudioTrack> {
        self.tracks.get(self.current_index)
    }

    /// Advance the cursor and return the new current track.
    ///
    /// Boundary behavior by repeat mode: `Off` returns `None` past the last
    /// track (queue finished); `All` wraps to the first; `One` replays the
    /// current track without moving the cursor.
    pub fn next(&mut self) -> Option<&AudioTrack> {
        if self.tracks.is_empty() {
            return None;
        }

        match self.repeat_mode {
            RepeatMode::One => self.current(),
            RepeatMode::All => {
                self.current_index = (self.current_index + 1) % self.tracks.len();
                self.current()
            }
            RepeatMode::Off => {
                if self.current_index + 1 < self.tracks.len() {
                    self.current_index += 1;
                    self.current()
                } else {
                    None
                }
            }
        }
    }

    /// Retreat the cursor and return the new current track.
    ///
    /// Moves normally even under `One` (replay applies to `next()` only).
    /// `All` wraps to the last track; otherwise `None` before the first.
    pub fn previous(&mut self) -> Option<&AudioTrack> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.current_index > 0 {
            self.current_index -= 1;
            self.current()
        } else if self.repeat_mode == RepeatMode::All {
            self.current_index = self.tracks.len() - 1;
            self.current()
        } else {
            None
        }
    }

    /// Set the cursor directly. No-op returning `None` for invalid indices.
    pub fn jump_to(&mut self, index: usize) -> Option<&AudioTrack> {
        if index < self.tracks.len() {
            self.current_index = index;
            self.current()
        } else {
            None
        }
    }

    /// Toggle shuffle.
    ///
    /// Turning on keeps the current track at the front of the new order and
    /// shuffles the rest, so what's playing doesn't jump. Turning off
    /// restores the original order and relocates the cursor to the current
    /// track's original position.
    pub fn toggle_shuffle(&mut self) {
        if self.tracks.is_empty() {
            self.is_shuffled = !self.is_shuffled;
            return;
        }

        if self.is_shuffled {
            let current_id = self.tracks[self.current_index].id();
            self.tracks.clone_from(&self.original_order);
            self.current_index = self
                .tracks
                .iter()
                .position(|t| t.id() == current_id)
                .unwrap_or(0);
            self.is_shuffled = false;
        } else {
            let current = self.tracks.remove(self.current_index);
            self.tracks.shuffle(&mut thread_rng());
            self.tracks.insert(0, current);
            self.current_index = 0;
            self.is_shuffled = true;
        }
    }

    /// Cycle repeat mode: off, all, one, off. Returns the new mode.
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat_mode = self.repeat_mode.cycled();
        self.repeat_mode
    }

    /// Set the repeat mode directly.
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    /// Current repeat mode.
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// Whether the active order is shuffled.
    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    /// Cursor position.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in active order.
    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    /// Album-level position for checkpointing.
    ///
    /// `track_fraction` is how far playback stands within the current track
    /// (0-1, clamped). The normalized value spans the whole queue:
    /// `(current_index + fraction) / total * 100`.
    pub fn album_position(&self, track_fraction: f64) -> Option<AlbumPosition> {
        let current = self.current()?;
        let fraction = track_fraction.clamp(0.0, 1.0);
        let normalized =
            (self.current_index as f64 + fraction) / self.tracks.len() as f64 * 100.0;

        Some(AlbumPosition {
            normalized,
            track_index: self.current_index,
            track_filename: current.filename.clone(),
        })
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}
