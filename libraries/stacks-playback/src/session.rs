//! Playback session orchestration
//!
//! Binds one media item (single file or album queue) to the player, the
//! progress store, and the scrubber. The session owns three repeating
//! timers: the position tick that pushes the playback clock into the
//! scrubber (suppressed while a scrub session is open), the checkpoint tick
//! that persists resume state, and the deceleration tick that integrates
//! scrubber momentum. All of them run inside one `select!` loop, so every
//! mutation is serialized on a single logical thread; teardown is one
//! idempotent routine invoked on every exit path.

use crate::error::{PlaybackError, Result};
use crate::events::{ScrubberEvent, SessionEvent};
use crate::player::MediaPlayer;
use crate::queue::QueueManager;
use crate::scrubber::Scrubber;
use crate::types::{SessionConfig, SessionItem};
use stacks_client::RetryPolicy;
use stacks_core::{format_clock, AudioTrack, PlaybackProgress, ALBUM_MARKER_FILENAME};
use stacks_progress::ProgressStore;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Commands a host (UI layer) feeds into a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Pan gesture began on the scrubber
    BeginScrub,
    /// Pan gesture moved; raw horizontal translation in points
    ScrubChanged {
        /// Accumulated horizontal translation
        translation_x: f64,
    },
    /// Pan gesture released; velocity in points per second
    EndScrub {
        /// Release velocity
        velocity_x: f64,
    },
    /// Tap on the scrubber
    Tap,
    /// Focus moved onto or off the scrubber
    SetFocused(bool),
    /// Accessibility step up
    AccessibilityIncrement,
    /// Accessibility step down
    AccessibilityDecrement,
    /// Skip to the next queue track (albums)
    NextTrack,
    /// Skip to the previous queue track (albums)
    PreviousTrack,
    /// Flush a checkpoint now (app backgrounding)
    Checkpoint,
    /// End the session
    Stop,
}

/// The file currently bound to the player.
#[derive(Debug, Clone)]
struct CurrentMedia {
    filename: String,
    url: url::Url,
    /// Duration from file metadata, used when the asset reports none
    metadata_duration: Option<f64>,
    /// Duration once the asset loaded
    duration: Option<f64>,
    track_id: String,
}

impl CurrentMedia {
    fn from_track(track: &AudioTrack) -> Self {
        Self {
            filename: track.filename.clone(),
            url: track.stream_url.clone(),
            metadata_duration: track.duration,
            duration: None,
            track_id: track.id(),
        }
    }

    fn best_duration(&self) -> Option<f64> {
        self.duration.or(self.metadata_duration)
    }
}

/// Orchestrates playback of one item against a platform player.
pub struct PlaybackSession<P: MediaPlayer> {
    player: Arc<Mutex<P>>,
    store: ProgressStore,
    retry: RetryPolicy,
    scrubber: Scrubber,
    queue: Option<QueueManager>,
    item: SessionItem,
    current: Option<CurrentMedia>,
    config: SessionConfig,
    events: VecDeque<SessionEvent>,
    last_track_id: Option<String>,
    torn_down: bool,
}

impl<P: MediaPlayer> std::fmt::Debug for PlaybackSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("item", &self.item.identifier)
            .field("current", &self.current.as_ref().map(|m| &m.filename))
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<P: MediaPlayer> PlaybackSession<P> {
    /// Session for a single video or audio file.
    pub fn single(
        player: P,
        store: ProgressStore,
        retry: RetryPolicy,
        item: SessionItem,
        filename: String,
        stream_url: url::Url,
        metadata_duration: Option<f64>,
    ) -> Self {
        let track_id = format!("{}/{}", item.identifier, filename);
        let mut scrubber = Scrubber::new(0.0, metadata_duration.unwrap_or(1.0));
        scrubber.set_text_formatter(Box::new(format_clock));

        Self {
            player: Arc::new(Mutex::new(player)),
            store,
            retry,
            scrubber,
            queue: None,
            item,
            current: Some(CurrentMedia {
                filename,
                url: stream_url,
                metadata_duration,
                duration: None,
                track_id,
            }),
            config: SessionConfig::default(),
            events: VecDeque::new(),
            last_track_id: None,
            torn_down: false,
        }
    }

    /// Session for an album queue.
    pub fn album(
        player: P,
        store: ProgressStore,
        retry: RetryPolicy,
        item: SessionItem,
        tracks: Vec<AudioTrack>,
        start_at: usize,
    ) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        let mut queue = QueueManager::new();
        queue.set_queue(tracks, start_at);
        let current = queue.current().map(CurrentMedia::from_track);

        let mut scrubber = Scrubber::new(
            0.0,
            current.as_ref().and_then(CurrentMedia::best_duration).unwrap_or(1.0),
        );
        scrubber.set_text_formatter(Box::new(format_clock));

        Ok(Self {
            player: Arc::new(Mutex::new(player)),
            store,
            retry,
            scrubber,
            queue: Some(queue),
            item,
            current,
            config: SessionConfig::default(),
            events: VecDeque::new(),
            last_track_id: None,
            torn_down: false,
        })
    }

    /// Override the timer cadence (tests).
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    /// The scrubber owned by this session.
    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Mutable scrubber access for gesture plumbing.
    pub fn scrubber_mut(&mut self) -> &mut Scrubber {
        &mut self.scrubber
    }

    /// The album queue, for sessions started with one.
    pub fn queue(&self) -> Option<&QueueManager> {
        self.queue.as_ref()
    }

    /// Mutable queue access (shuffle/repeat toggles from the UI).
    pub fn queue_mut(&mut self) -> Option<&mut QueueManager> {
        self.queue.as_mut()
    }

    /// Drain pending session events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Load the bound asset and begin playback.
    ///
    /// With a positive `resume_time`, playback start is deferred until the
    /// asset duration is known and a precise seek has completed, so resuming
    /// never shows a flash of the beginning. A negative or non-finite resume
    /// point (a corrupt record) is rejected before any seek. Asset loading
    /// runs under the retry policy; the error that comes back is already
    /// classified, and retrying the whole call with the same arguments is
    /// idempotent.
    pub async fn start(&mut self, resume_time: Option<f64>) -> Result<()> {
        let media = self.current.clone().ok_or(PlaybackError::NoTrackLoaded)?;

        let player = Arc::clone(&self.player);
        let url = media.url.clone();
        let loaded = self
            .retry
            .run("load asset", move || {
                let player = Arc::clone(&player);
                let url = url.clone();
                async move { player.lock().await.load(&url).await }
            })
            .await?;

        // Duration failure is non-fatal: fall back to file metadata. With
        // neither, playback still starts and the scrubber keeps its
        // placeholder upper bound.
        let duration = loaded.or(media.metadata_duration);
        if let Some(duration) = duration {
            self.scrubber.set_max(duration);
        }
        if let Some(current) = self.current.as_mut() {
            current.duration = duration;
        }

        match resume_time {
            Some(resume) if !resume.is_finite() || resume < 0.0 => {
                return Err(PlaybackError::InvalidSeekPosition(resume));
            }
            Some(resume) if resume > 0.0 => {
                let mut player = self.player.lock().await;
                player.seek(resume).await?;
                player.play();
                self.scrubber.set_value(resume, false);
                info!(item = %self.item.identifier, resume, "Resumed playback");
            }
            _ => {
                self.player.lock().await.play();
                self.scrubber.set_value(0.0, false);
                debug!(item = %self.item.identifier, "Started playback");
            }
        }

        let previous_track_id = self.last_track_id.replace(media.track_id.clone());
        self.events.push_back(SessionEvent::TrackChanged {
            track_id: media.track_id,
            previous_track_id,
        });
        Ok(())
    }

    /// Start from the stored resume point, if one exists.
    ///
    /// Single files resume from their exact record; albums jump the queue to
    /// the recorded track and seek within it using the real-seconds fields,
    /// not the normalized album scale.
    pub async fn start_resuming(&mut self) -> Result<()> {
        if self.queue.is_some() {
            let record = self
                .store
                .get(&self.item.identifier, ALBUM_MARKER_FILENAME)
                .await?;

            if let Some(record) = record {
                if let (Some(index), Some(seconds)) =
                    (record.track_index, record.track_current_time)
                {
                    let track = self
                        .queue
                        .as_mut()
                        .and_then(|queue| queue.jump_to(index))
                        .cloned();
                    if let Some(track) = track {
                        self.current = Some(CurrentMedia::from_track(&track));
                        return self.start(Some(seconds)).await;
                    }
                }
            }
            return self.start(None).await;
        }

        let filename = self
            .current
            .as_ref()
            .ok_or(PlaybackError::NoTrackLoaded)?
            .filename
            .clone();
        let resume = self
            .store
            .get(&self.item.identifier, &filename)
            .await?
            .map(|record| record.current_time);
        self.start(resume).await
    }

    /// Discard the stored resume point and start from the beginning.
    pub async fn start_over(&mut self) -> Result<()> {
        if self.queue.is_some() {
            self.store
                .remove(&self.item.identifier, ALBUM_MARKER_FILENAME)
                .await?;
            let first = self
                .queue
                .as_mut()
                .and_then(|queue| queue.jump_to(0))
                .cloned();
            if let Some(track) = first {
                self.current = Some(CurrentMedia::from_track(&track));
            }
        } else if let Some(media) = &self.current {
            let filename = media.filename.clone();
            self.store.remove(&self.item.identifier, &filename).await?;
        }
        self.start(None).await
    }

    /// Push the playback clock into the scrubber and emit a position event.
    ///
    /// Suppressed entirely while a scrub session is open, so the clock never
    /// fights user-driven scrubbing. Returns whether the current asset has
    /// reached its natural end.
    pub async fn position_tick(&mut self) -> bool {
        let (position, player_duration, finished) = {
            let player = self.player.lock().await;
            (player.position(), player.duration(), player.is_finished())
        };

        if self.scrubber.has_open_session() {
            return finished;
        }

        let duration = player_duration.or_else(|| {
            self.current.as_ref().and_then(CurrentMedia::best_duration)
        });

        self.scrubber.set_value(position, false);
        self.events.push_back(SessionEvent::PositionUpdate {
            position_secs: position,
            duration_secs: duration,
        });

        finished
    }

    /// Persist a checkpoint for the current position.
    ///
    /// Skipped when less than the checkpoint floor has elapsed in the
    /// current file or no duration is known (the store applies the same
    /// floor on creation; both guards are intentional). Save failures are
    /// best-effort: logged and swallowed, never user-facing.
    pub async fn checkpoint(&mut self) {
        let Some(media) = self.current.clone() else {
            return;
        };

        let (position, player_duration) = {
            let player = self.player.lock().await;
            (player.position(), player.duration())
        };

        let Some(duration) = player_duration.or(media.best_duration()).filter(|d| *d > 0.0)
        else {
            return;
        };
        if position < self.config.min_checkpoint_secs {
            return;
        }

        let progress = match &self.queue {
            None => PlaybackProgress {
                item_identifier: self.item.identifier.clone(),
                filename: media.filename.clone(),
                current_time: position,
                duration,
                last_watched: chrono::Utc::now(),
                title: self.item.title.clone(),
                media_kind: self.item.media_kind,
                image_url: self.item.image_url.clone(),
                track_index: None,
                track_filename: None,
                track_current_time: None,
            },
            Some(queue) => {
                let Some(album) = queue.album_position(position / duration) else {
                    return;
                };
                PlaybackProgress {
                    item_identifier: self.item.identifier.clone(),
                    filename: ALBUM_MARKER_FILENAME.to_string(),
                    current_time: album.normalized,
                    duration: 100.0,
                    last_watched: chrono::Utc::now(),
                    title: self.item.title.clone(),
                    media_kind: self.item.media_kind,
                    image_url: self.item.image_url.clone(),
                    track_index: Some(album.track_index),
                    track_filename: Some(album.track_filename),
                    track_current_time: Some(position),
                }
            }
        };

        if let Err(error) = self.store.save(&progress).await {
            warn!(item = %self.item.identifier, %error, "Checkpoint save failed");
        }
    }

    /// React to scrubber lifecycle events.
    ///
    /// Begin pauses playback; finish (momentum settled, session closed) is
    /// the single signal that commits the seek and resumes. End and value
    /// changes need no playback action.
    pub async fn process_scrubber_events(&mut self) -> Result<()> {
        for event in self.scrubber.take_events() {
            match event {
                ScrubberEvent::BeginScrubbing => {
                    self.player.lock().await.pause();
                }
                ScrubberEvent::FinishScrubbing => {
                    let target = self.scrubber.value();
                    let mut player = self.player.lock().await;
                    player.seek(target).await?;
                    player.play();
                }
                ScrubberEvent::ValueChanged { .. }
                | ScrubberEvent::EndScrubbing
                | ScrubberEvent::Tap => {}
            }
        }
        Ok(())
    }

    /// Handle the current asset reaching its natural end.
    ///
    /// Single files drop their resume record (watched-to-end means no
    /// resume). Albums advance the queue; when it finishes with repeat off,
    /// the album marker is removed entirely (fully complete) and the session
    /// ends. Returns whether the session is over.
    pub async fn handle_track_finished(&mut self) -> Result<bool> {
        let Some(media) = self.current.clone() else {
            return Ok(true);
        };
        self.events.push_back(SessionEvent::TrackFinished {
            track_id: media.track_id.clone(),
        });

        if self.queue.is_none() {
            if let Err(error) = self.store.remove(&self.item.identifier, &media.filename).await {
                warn!(item = %self.item.identifier, %error, "Failed to clear finished record");
            }
            return Ok(true);
        }

        let next = self
            .queue
            .as_mut()
            .and_then(|queue| queue.next())
            .cloned();

        match next {
            Some(track) => {
                self.current = Some(CurrentMedia::from_track(&track));
                self.start(None).await?;
                Ok(false)
            }
            None => {
                if let Err(error) = self
                    .store
                    .remove(&self.item.identifier, ALBUM_MARKER_FILENAME)
                    .await
                {
                    warn!(item = %self.item.identifier, %error, "Failed to clear album marker");
                }
                self.events.push_back(SessionEvent::QueueFinished);
                Ok(true)
            }
        }
    }

    /// Idempotent teardown: flushes one final checkpoint and pauses.
    ///
    /// Invoked from every exit path of [`PlaybackSession::run`]; the timers
    /// themselves die with the run loop.
    pub async fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.checkpoint().await;
        self.player.lock().await.pause();
        debug!(item = %self.item.identifier, "Session torn down");
    }

    /// Drive the session until stopped.
    ///
    /// One `select!` loop serializes the position tick, the checkpoint tick,
    /// the deceleration tick (armed only while momentum is live), and host
    /// commands. Teardown runs on every exit path.
    pub async fn run(&mut self, commands: mpsc::Receiver<SessionCommand>) -> Result<()> {
        let result = self.run_loop(commands).await;
        self.shutdown().await;
        result
    }

    async fn run_loop(&mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Result<()> {
        let mut position_tick = interval_at(
            Instant::now() + self.config.position_tick,
            self.config.position_tick,
        );
        position_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut checkpoint_tick = interval_at(
            Instant::now() + self.config.checkpoint_interval,
            self.config.checkpoint_interval,
        );
        checkpoint_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut deceleration_tick = interval(self.config.deceleration_tick);
        deceleration_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = position_tick.tick() => {
                    if self.position_tick().await && self.handle_track_finished().await? {
                        break;
                    }
                }
                _ = checkpoint_tick.tick() => {
                    self.checkpoint().await;
                }
                _ = deceleration_tick.tick(), if self.scrubber.is_decelerating() => {
                    self.scrubber.tick(self.config.deceleration_tick);
                    self.process_scrubber_events().await?;
                }
                command = commands.recv() => {
                    match command {
                        None | Some(SessionCommand::Stop) => break,
                        Some(command) => {
                            if let Err(error) = self.handle_command(command).await {
                                warn!(%error, "Command failed");
                                self.events.push_back(SessionEvent::Error {
                                    message: error.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::Play => self.player.lock().await.play(),
            SessionCommand::Pause => self.player.lock().await.pause(),
            SessionCommand::BeginScrub => self.scrubber.begin_drag(),
            SessionCommand::ScrubChanged { translation_x } => {
                self.scrubber.drag_changed(translation_x);
            }
            SessionCommand::EndScrub { velocity_x } => self.scrubber.drag_ended(velocity_x),
            SessionCommand::Tap => self.scrubber.tap(),
            SessionCommand::SetFocused(focused) => self.scrubber.set_focused(focused),
            SessionCommand::AccessibilityIncrement => self.scrubber.accessibility_increment(),
            SessionCommand::AccessibilityDecrement => self.scrubber.accessibility_decrement(),
            SessionCommand::NextTrack => {
                let next = self.queue.as_mut().and_then(|q| q.next()).cloned();
                if let Some(track) = next {
                    self.current = Some(CurrentMedia::from_track(&track));
                    self.start(None).await?;
                }
            }
            SessionCommand::PreviousTrack => {
                let previous = self.queue.as_mut().and_then(|q| q.previous()).cloned();
                if let Some(track) = previous {
                    self.current = Some(CurrentMedia::from_track(&track));
                    self.start(None).await?;
                }
            }
            SessionCommand::Checkpoint => self.checkpoint().await,
            SessionCommand::Stop => {}
        }
        self.process_scrubber_events().await
    }

    /// Cadence of the deceleration timer (exposed for hosts driving ticks).
    pub fn deceleration_tick(&self) -> Duration {
        self.config.deceleration_tick
    }
}
