//! Remote item metadata shapes
//!
//! Deserialized forms of the library service's metadata responses. Only the
//! fields the playback core reads are modeled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// One file inside an item, as listed by the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Filename within the item
    pub name: String,

    /// Format label, e.g. `"VBR MP3"`, `"h.264"`, `"WebVTT"`, `"SubRip"`
    #[serde(default)]
    pub format: Option<String>,

    /// `"original"` or `"derivative"`
    #[serde(default)]
    pub source: Option<String>,

    /// Track title (audio files)
    #[serde(default)]
    pub title: Option<String>,

    /// Track number, `"3"` or `"3/12"` form (audio files)
    #[serde(default)]
    pub track: Option<String>,

    /// Duration as `"mm:ss"`, `"hh:mm:ss"`, or plain seconds
    #[serde(default)]
    pub length: Option<String>,

    /// Artist/creator credited on the file
    #[serde(default)]
    pub artist: Option<String>,

    /// Album the file belongs to
    #[serde(default)]
    pub album: Option<String>,
}

/// Item-level descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// Remote content identifier
    pub identifier: String,

    /// Item title
    #[serde(default)]
    pub title: Option<String>,

    /// Media kind wire name (`"movies"`, `"etree"`, ...)
    #[serde(default)]
    pub mediatype: Option<String>,

    /// Artist/creator credited on the item
    #[serde(default)]
    pub creator: Option<String>,
}

/// Full metadata response: item details plus its file listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Item-level metadata
    pub metadata: ItemDetails,

    /// Files within the item
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Parse a metadata duration string into seconds.
///
/// The service emits durations inconsistently: `"205.36"`, `"3:25"`, or
/// `"1:02:03"` all occur in the wild.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if !raw.contains(':') {
        return raw.parse::<f64>().ok().filter(|secs| *secs >= 0.0);
    }

    let mut total = 0.0;
    for part in raw.split(':') {
        let value = part.trim().parse::<f64>().ok()?;
        if value < 0.0 {
            return None;
        }
        total = total * 60.0 + value;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_duration("205.36"), Some(205.36));
        assert_eq!(parse_duration("0"), Some(0.0));
    }

    #[test]
    fn parses_clock_forms() {
        assert_eq!(parse_duration("3:25"), Some(205.0));
        assert_eq!(parse_duration("1:02:03"), Some(3723.0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("1:xx"), None);
        assert_eq!(parse_duration("-5"), None);
    }

    #[test]
    fn deserializes_file_entry_with_missing_fields() {
        let entry: FileEntry = serde_json::from_str(r#"{"name":"track01.mp3"}"#).unwrap();
        assert_eq!(entry.name, "track01.mp3");
        assert!(entry.track.is_none());
        assert!(entry.length.is_none());
    }
}
