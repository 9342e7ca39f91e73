//! Playback orchestration for Stacks
//!
//! State machines for media playback against a remote library: the scrubber
//! seek control, the album track queue, and the session that binds a player,
//! the progress store, and the retry policy together. The platform supplies
//! the actual player behind [`MediaPlayer`]; everything here is testable
//! without one.

pub mod error;
pub mod events;
pub mod player;
pub mod queue;
pub mod scrubber;
pub mod session;
pub mod types;

pub use error::{PlaybackError, Result};
pub use events::{ScrubberEvent, SessionEvent};
pub use player::MediaPlayer;
pub use queue::{AlbumPosition, QueueManager};
pub use scrubber::{ScrubPhase, Scrubber};
pub use session::{PlaybackSession, SessionCommand};
pub use types::{RepeatMode, SessionConfig, SessionItem};
