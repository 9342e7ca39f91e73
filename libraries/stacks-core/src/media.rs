//! Media kind classification

use serde::{Deserialize, Serialize};

/// Kind of media an item holds, as named by the remote library service.
///
/// The service tags video items `"movies"` and live/audio items `"etree"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    /// Video content
    #[serde(rename = "movies")]
    Movies,

    /// Audio content (concert/album collections)
    #[serde(rename = "etree")]
    Etree,
}

impl MediaKind {
    /// Wire name used by the remote service and the progress table.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movies => "movies",
            MediaKind::Etree => "etree",
        }
    }

    /// Parse a wire name. Unknown kinds are rejected.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movies" => Some(MediaKind::Movies),
            "etree" => Some(MediaKind::Etree),
            _ => None,
        }
    }

    /// Whether this kind is video.
    pub fn is_video(self) -> bool {
        matches!(self, MediaKind::Movies)
    }

    /// Whether this kind is audio.
    pub fn is_audio(self) -> bool {
        matches!(self, MediaKind::Etree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_names() {
        assert_eq!(MediaKind::from_str("movies"), Some(MediaKind::Movies));
        assert_eq!(MediaKind::from_str("etree"), Some(MediaKind::Etree));
        assert_eq!(MediaKind::Movies.as_str(), "movies");
        assert_eq!(MediaKind::from_str("texts"), None);
    }

    #[test]
    fn classifies_video_and_audio() {
        assert!(MediaKind::Movies.is_video());
        assert!(!MediaKind::Movies.is_audio());
        assert!(MediaKind::Etree.is_audio());
    }
}
