//! SQLite-backed playback progress store

use crate::error::{Result, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use stacks_core::{MediaKind, PlaybackProgress, COMPLETION_THRESHOLD, MIN_CHECKPOINT_SECS};
use std::str::FromStr;
use tracing::debug;

/// Keyed, durable store of playback checkpoints.
///
/// Records are keyed by `(item_identifier, filename)`; saving an existing key
/// replaces the record (last-write-wins, no merging). The store survives
/// process restarts and backs the continue-watching/listening shelves.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    pool: SqlitePool,
}

impl ProgressStore {
    /// Open (creating if missing) a store at the given SQLite URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // In-memory databases exist per connection; keep the pool at one
        // connection so every query sees the same database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory store (tests).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Underlying pool (tests).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Embedded migrations for reliability across execution contexts
        const MIGRATIONS: &[&str] =
            &[include_str!("../migrations/0001_create_playback_progress.sql")];

        for migration in MIGRATIONS {
            for statement in migration.split(';').filter(|s| !s.trim().is_empty()) {
                sqlx::query(statement)
                    .execute(pool)
                    .await
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Upsert a checkpoint. `last_watched` is always set to now.
    ///
    /// Positions under the creation floor (10 seconds, or missing duration)
    /// are not persisted and return `Ok(false)`. Album marker records are
    /// exempt: their scale is normalized 0-100, not seconds, and the in-track
    /// floor is enforced by the playback session.
    pub async fn save(&self, progress: &PlaybackProgress) -> Result<bool> {
        if !progress.is_album_entry()
            && (progress.current_time < MIN_CHECKPOINT_SECS || progress.duration <= 0.0)
        {
            debug!(
                item = %progress.item_identifier,
                position = progress.current_time,
                "Skipping checkpoint under creation floor"
            );
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp_micros();
        let track_index = progress.track_index.map(|i| i as i64);

        sqlx::query(
            "INSERT INTO playback_progress
             (item_identifier, filename, position_seconds, duration_seconds, last_watched,
              title, media_kind, image_url, track_index, track_filename, track_position_seconds)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(item_identifier, filename)
             DO UPDATE SET
                position_seconds = excluded.position_seconds,
                duration_seconds = excluded.duration_seconds,
                last_watched = excluded.last_watched,
                title = excluded.title,
                media_kind = excluded.media_kind,
                image_url = excluded.image_url,
                track_index = excluded.track_index,
                track_filename = excluded.track_filename,
                track_position_seconds = excluded.track_position_seconds",
        )
        .bind(&progress.item_identifier)
        .bind(&progress.filename)
        .bind(progress.current_time)
        .bind(progress.duration)
        .bind(now)
        .bind(&progress.title)
        .bind(progress.media_kind.as_str())
        .bind(&progress.image_url)
        .bind(track_index)
        .bind(&progress.track_filename)
        .bind(progress.track_current_time)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    /// Exact-key lookup.
    pub async fn get(&self, identifier: &str, filename: &str) -> Result<Option<PlaybackProgress>> {
        let row = sqlx::query(
            "SELECT * FROM playback_progress WHERE item_identifier = ? AND filename = ?",
        )
        .bind(identifier)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_progress(&r)).transpose()
    }

    /// Most recently touched record for an item, regardless of filename.
    ///
    /// Single-file playback resumes from its exact filename; album playback
    /// resumes from the marker record. Either way the latest record for the
    /// identifier is the resume point.
    pub async fn latest_for_item(&self, identifier: &str) -> Result<Option<PlaybackProgress>> {
        let row = sqlx::query(
            "SELECT * FROM playback_progress WHERE item_identifier = ?
             ORDER BY last_watched DESC LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_progress(&r)).transpose()
    }

    /// Delete one record. Returns whether a record existed.
    pub async fn remove(&self, identifier: &str, filename: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM playback_progress WHERE item_identifier = ? AND filename = ?",
        )
        .bind(identifier)
        .bind(filename)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Incomplete video records, most recently watched first.
    pub async fn continue_watching(&self) -> Result<Vec<PlaybackProgress>> {
        self.incomplete(Some(MediaKind::Movies)).await
    }

    /// Incomplete audio records, most recently listened first.
    pub async fn continue_listening(&self) -> Result<Vec<PlaybackProgress>> {
        self.incomplete(Some(MediaKind::Etree)).await
    }

    /// Incomplete records, optionally filtered by media kind, most recent first.
    pub async fn incomplete(&self, kind: Option<MediaKind>) -> Result<Vec<PlaybackProgress>> {
        let kind_str = kind.map(MediaKind::as_str);
        let rows = sqlx::query(
            "SELECT * FROM playback_progress
             WHERE (duration_seconds <= 0 OR position_seconds / duration_seconds < ?)
               AND (? IS NULL OR media_kind = ?)
             ORDER BY last_watched DESC",
        )
        .bind(COMPLETION_THRESHOLD)
        .bind(kind_str)
        .bind(kind_str)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_progress).collect()
    }
}

fn row_to_progress(row: &SqliteRow) -> Result<PlaybackProgress> {
    let kind_str: String = row.get("media_kind");
    let media_kind = MediaKind::from_str(&kind_str)
        .ok_or_else(|| StorageError::CorruptRecord(format!("unknown media kind {kind_str:?}")))?;

    let last_watched_micros: i64 = row.get("last_watched");
    let last_watched = chrono::DateTime::from_timestamp_micros(last_watched_micros)
        .ok_or_else(|| StorageError::CorruptRecord("invalid timestamp".to_string()))?;

    Ok(PlaybackProgress {
        item_identifier: row.get("item_identifier"),
        filename: row.get("filename"),
        current_time: row.get("position_seconds"),
        duration: row.get("duration_seconds"),
        last_watched,
        title: row.get("title"),
        media_kind,
        image_url: row.get("image_url"),
        track_index: row.get::<Option<i64>, _>("track_index").map(|i| i as usize),
        track_filename: row.get("track_filename"),
        track_current_time: row.get("track_position_seconds"),
    })
}
