//! Platform player seam
//!
//! The session is platform-agnostic; loading and decoding remote assets is
//! provided by the platform behind this trait, mirroring how the UI layer
//! wraps its native player.

use async_trait::async_trait;
use url::Url;

/// Platform media player the session orchestrates.
#[async_trait]
pub trait MediaPlayer: Send {
    /// Load a remote asset and return its duration in seconds, when the
    /// asset reports one. Failures here are network-classified so the
    /// retry policy can decide retry-vs-surface.
    async fn load(&mut self, url: &Url) -> stacks_client::Result<Option<f64>>;

    /// Begin or resume playback.
    fn play(&mut self);

    /// Pause playback, keeping the asset loaded.
    fn pause(&mut self);

    /// Precise seek (zero tolerance) to the given position in seconds.
    /// Platform failures come back as [`crate::PlaybackError::Player`].
    async fn seek(&mut self, seconds: f64) -> crate::Result<()>;

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Asset duration in seconds, once known.
    fn duration(&self) -> Option<f64>;

    /// Whether playback reached the natural end of the asset.
    fn is_finished(&self) -> bool;
}
