//! Audio track metadata
//!
//! Tracks are derived from the item file listing: one [`AudioTrack`] per
//! playable audio file, with stream and thumbnail URLs built deterministically
//! from identifiers.

use crate::metadata::{parse_duration, FileEntry, ItemDetails};
use crate::urls::Endpoints;
use serde::{Deserialize, Serialize};
use url::Url;

/// One playable audio track within an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Remote content identifier of the owning item
    pub item_identifier: String,

    /// Filename within the item
    pub filename: String,

    /// Track number parsed from metadata, if present
    pub number: Option<u32>,

    /// Track title; falls back to the filename stem
    pub title: String,

    /// Artist, if credited
    pub artist: Option<String>,

    /// Album; falls back to the item title
    pub album: Option<String>,

    /// Duration in seconds, if the listing carried one
    pub duration: Option<f64>,

    /// Stream URL, derived from identifier + filename
    pub stream_url: Url,

    /// Thumbnail URL, derived from the identifier alone
    pub thumbnail_url: Url,
}

impl AudioTrack {
    /// Stable identity: `"{item_identifier}/{filename}"`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.item_identifier, self.filename)
    }

    /// Build a track from a file listing entry.
    pub fn from_file(file: &FileEntry, item: &ItemDetails, endpoints: &Endpoints) -> Self {
        let title = file
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| filename_stem(&file.name).to_string());

        let album = file
            .album
            .clone()
            .filter(|a| !a.is_empty())
            .or_else(|| item.title.clone());

        Self {
            item_identifier: item.identifier.clone(),
            filename: file.name.clone(),
            number: file.track.as_deref().and_then(parse_track_number),
            title,
            artist: file.artist.clone().or_else(|| item.creator.clone()),
            album,
            duration: file.length.as_deref().and_then(parse_duration),
            stream_url: endpoints.download_url(&item.identifier, &file.name),
            thumbnail_url: endpoints.thumbnail_url(&item.identifier),
        }
    }
}

/// Parse a track-number field: `"3"` or `"3/12"`.
pub fn parse_track_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let number = raw.split('/').next()?.trim();
    number.parse::<u32>().ok()
}

/// Order tracks by ascending number; unnumbered tracks sort after all
/// numbered ones, keeping their relative order.
pub fn sort_tracks(tracks: &mut [AudioTrack]) {
    // Stable sort preserves relative order among unnumbered tracks
    tracks.sort_by_key(|track| (track.number.is_none(), track.number));
}

fn filename_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(filename: &str, number: Option<u32>) -> AudioTrack {
        let endpoints = Endpoints::default();
        AudioTrack {
            item_identifier: "item".to_string(),
            filename: filename.to_string(),
            number,
            title: filename.to_string(),
            artist: None,
            album: None,
            duration: None,
            stream_url: endpoints.download_url("item", filename),
            thumbnail_url: endpoints.thumbnail_url("item"),
        }
    }

    #[test]
    fn parses_track_numbers() {
        assert_eq!(parse_track_number("3"), Some(3));
        assert_eq!(parse_track_number("3/12"), Some(3));
        assert_eq!(parse_track_number(" 7 / 20 "), Some(7));
        assert_eq!(parse_track_number("A1"), None);
        assert_eq!(parse_track_number(""), None);
    }

    #[test]
    fn numbered_before_unnumbered_preserving_relative_order() {
        let mut tracks = vec![
            track("c.mp3", Some(3)),
            track("x.mp3", None),
            track("a.mp3", Some(1)),
            track("y.mp3", None),
        ];
        sort_tracks(&mut tracks);
        let order: Vec<_> = tracks.iter().map(|t| t.filename.as_str()).collect();
        assert_eq!(order, ["a.mp3", "c.mp3", "x.mp3", "y.mp3"]);
    }

    #[test]
    fn serde_round_trips_including_urls() {
        let original = track("d1t01.mp3", Some(1));
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("https://archive.org/download/item/d1t01.mp3"));

        let restored: AudioTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn builds_track_from_file_entry() {
        let endpoints = Endpoints::default();
        let item = ItemDetails {
            identifier: "gd1977-05-08".to_string(),
            title: Some("Barton Hall".to_string()),
            mediatype: Some("etree".to_string()),
            creator: Some("Grateful Dead".to_string()),
        };
        let file = FileEntry {
            name: "d1t01.mp3".to_string(),
            format: Some("VBR MP3".to_string()),
            source: Some("derivative".to_string()),
            title: None,
            track: Some("1/12".to_string()),
            length: Some("7:32".to_string()),
            artist: None,
            album: None,
        };

        let track = AudioTrack::from_file(&file, &item, &endpoints);
        assert_eq!(track.id(), "gd1977-05-08/d1t01.mp3");
        assert_eq!(track.number, Some(1));
        assert_eq!(track.title, "d1t01"); // filename stem fallback
        assert_eq!(track.album.as_deref(), Some("Barton Hall"));
        assert_eq!(track.artist.as_deref(), Some("Grateful Dead"));
        assert_eq!(track.duration, Some(452.0));
        assert_eq!(
            track.stream_url.as_str(),
            "https://archive.org/download/gd1977-05-08/d1t01.mp3"
        );
    }
}
