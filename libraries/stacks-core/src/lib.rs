//! Stacks - Core Types
//!
//! Shared value types and pure logic for the Stacks playback core:
//! - Media kinds (video vs audio collections)
//! - Playback progress records and completion math
//! - Audio track metadata, track-number parsing, and ordering
//! - Remote item/file metadata shapes
//! - Stream/thumbnail URL construction
//! - Subtitle track extraction and selection
//!
//! This crate has no I/O. Persistence lives in `stacks-progress`,
//! networking in `stacks-client`, and state machines in `stacks-playback`.

mod media;
mod metadata;
mod progress;
mod subtitles;
mod timefmt;
mod track;
mod urls;

pub use media::MediaKind;
pub use metadata::{parse_duration, FileEntry, ItemDetails, ItemMetadata};
pub use progress::{
    filter_incomplete, PlaybackProgress, ALBUM_MARKER_FILENAME, COMPLETION_THRESHOLD,
    MIN_CHECKPOINT_SECS,
};
pub use subtitles::{select_subtitle_tracks, SubtitleFormat, SubtitleTrack};
pub use timefmt::format_clock;
pub use track::{parse_track_number, sort_tracks, AudioTrack};
pub use urls::Endpoints;
