//! Integration tests for the progress store.

use stacks_core::{MediaKind, PlaybackProgress, ALBUM_MARKER_FILENAME};
use stacks_progress::ProgressStore;
use std::time::Duration;

fn video(identifier: &str, filename: &str, current: f64, duration: f64) -> PlaybackProgress {
    PlaybackProgress {
        item_identifier: identifier.to_string(),
        filename: filename.to_string(),
        current_time: current,
        duration,
        last_watched: chrono::Utc::now(),
        title: Some("A Film".to_string()),
        media_kind: MediaKind::Movies,
        image_url: None,
        track_index: None,
        track_filename: None,
        track_current_time: None,
    }
}

fn album_marker(identifier: &str, normalized: f64) -> PlaybackProgress {
    PlaybackProgress {
        item_identifier: identifier.to_string(),
        filename: ALBUM_MARKER_FILENAME.to_string(),
        current_time: normalized,
        duration: 100.0,
        last_watched: chrono::Utc::now(),
        title: Some("A Show".to_string()),
        media_kind: MediaKind::Etree,
        image_url: None,
        track_index: Some(2),
        track_filename: Some("d1t03.mp3".to_string()),
        track_current_time: Some(100.0),
    }
}

// Spacing between saves so last_watched timestamps are strictly ordered
async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn creates_record_at_floor_and_skips_below_it() {
    let store = ProgressStore::in_memory().await.unwrap();

    assert!(!store.save(&video("x", "a.mp4", 9.99, 100.0)).await.unwrap());
    assert!(store.get("x", "a.mp4").await.unwrap().is_none());

    assert!(store.save(&video("x", "a.mp4", 10.0, 100.0)).await.unwrap());
    let saved = store.get("x", "a.mp4").await.unwrap().unwrap();
    assert_eq!(saved.current_time, 10.0);
}

#[tokio::test]
async fn missing_duration_is_never_persisted() {
    let store = ProgressStore::in_memory().await.unwrap();
    assert!(!store.save(&video("x", "a.mp4", 650.0, 0.0)).await.unwrap());
    assert!(!store.save(&video("x", "a.mp4", 650.0, -1.0)).await.unwrap());
}

#[tokio::test]
async fn upsert_replaces_by_key_without_duplicates() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("x", "a.mp4", 100.0, 1200.0)).await.unwrap();
    settle().await;
    store.save(&video("x", "a.mp4", 650.0, 1200.0)).await.unwrap();

    let saved = store.get("x", "a.mp4").await.unwrap().unwrap();
    assert_eq!(saved.current_time, 650.0);

    let shelf = store.continue_watching().await.unwrap();
    assert_eq!(shelf.len(), 1);
}

#[tokio::test]
async fn shelf_orders_most_recent_first() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("first", "a.mp4", 100.0, 1200.0)).await.unwrap();
    settle().await;
    store.save(&video("second", "b.mp4", 100.0, 1200.0)).await.unwrap();
    settle().await;
    store.save(&video("third", "c.mp4", 100.0, 1200.0)).await.unwrap();

    let shelf = store.continue_watching().await.unwrap();
    let order: Vec<_> = shelf.iter().map(|r| r.item_identifier.as_str()).collect();
    assert_eq!(order, ["third", "second", "first"]);
}

#[tokio::test]
async fn complete_records_leave_the_shelf() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("done", "a.mp4", 95.0, 100.0)).await.unwrap();
    store.save(&video("going", "b.mp4", 94.0, 100.0)).await.unwrap();

    let shelf = store.continue_watching().await.unwrap();
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0].item_identifier, "going");
}

#[tokio::test]
async fn shelves_split_by_media_kind() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("film", "a.mp4", 100.0, 1200.0)).await.unwrap();
    store.save(&album_marker("show", 50.0)).await.unwrap();

    let watching = store.continue_watching().await.unwrap();
    assert_eq!(watching.len(), 1);
    assert_eq!(watching[0].item_identifier, "film");

    let listening = store.continue_listening().await.unwrap();
    assert_eq!(listening.len(), 1);
    assert_eq!(listening[0].item_identifier, "show");

    assert_eq!(store.incomplete(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn album_marker_bypasses_seconds_floor_and_round_trips() {
    let store = ProgressStore::in_memory().await.unwrap();

    // 5% through an album is far under 10 "seconds" but must persist
    assert!(store.save(&album_marker("show", 5.0)).await.unwrap());

    let saved = store.get("show", ALBUM_MARKER_FILENAME).await.unwrap().unwrap();
    assert!(saved.is_album_entry());
    assert_eq!(saved.current_time, 5.0);
    assert_eq!(saved.track_index, Some(2));
    assert_eq!(saved.track_filename.as_deref(), Some("d1t03.mp3"));
    assert_eq!(saved.track_current_time, Some(100.0));
}

#[tokio::test]
async fn latest_for_item_picks_most_recent_file() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("x", "part1.mp4", 100.0, 1200.0)).await.unwrap();
    settle().await;
    store.save(&video("x", "part2.mp4", 30.0, 1200.0)).await.unwrap();

    let latest = store.latest_for_item("x").await.unwrap().unwrap();
    assert_eq!(latest.filename, "part2.mp4");

    assert!(store.latest_for_item("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn remove_deletes_one_record() {
    let store = ProgressStore::in_memory().await.unwrap();

    store.save(&video("x", "a.mp4", 100.0, 1200.0)).await.unwrap();
    assert!(store.remove("x", "a.mp4").await.unwrap());
    assert!(!store.remove("x", "a.mp4").await.unwrap());
    assert!(store.get("x", "a.mp4").await.unwrap().is_none());
}

#[tokio::test]
async fn progress_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("progress.db").display());

    {
        let store = ProgressStore::new(&url).await.unwrap();
        store.save(&video("x", "a.mp4", 650.0, 1200.0)).await.unwrap();
    }

    let reopened = ProgressStore::new(&url).await.unwrap();
    let saved = reopened.get("x", "a.mp4").await.unwrap().unwrap();
    assert_eq!(saved.current_time, 650.0);
    assert_eq!(saved.duration, 1200.0);
}
