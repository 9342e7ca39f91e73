//! Subtitle track extraction
//!
//! Scans an item's file listing for subtitle files and reduces them to a
//! deduplicated, sorted selection. For the same language the WebVTT variant
//! wins over SubRip; auto-generated and human tracks stay separate entries
//! even when the language matches.

use crate::metadata::FileEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subtitle file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    /// WebVTT (preferred; playable natively)
    Vtt,

    /// SubRip (needs conversion before display)
    Srt,
}

/// A selectable subtitle track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Filename within the item
    pub filename: String,

    /// Language code parsed from the filename, e.g. `"en"`
    pub language: String,

    /// Format of the underlying file
    pub format: SubtitleFormat,

    /// Whether the track was machine-generated
    pub auto_generated: bool,
}

impl SubtitleTrack {
    /// Human-readable label for track pickers.
    pub fn label(&self) -> String {
        if self.auto_generated {
            format!("{} (auto-generated)", self.language)
        } else {
            self.language.clone()
        }
    }
}

/// Extract subtitle tracks from a file listing.
///
/// Result is deduplicated per `(language, auto_generated)` pair and sorted by
/// language, human tracks before auto-generated ones.
pub fn select_subtitle_tracks(files: &[FileEntry]) -> Vec<SubtitleTrack> {
    let mut best: BTreeMap<(String, bool), SubtitleTrack> = BTreeMap::new();

    for file in files {
        let Some(track) = subtitle_from_file(file) else {
            continue;
        };
        let key = (track.language.clone(), track.auto_generated);
        match best.get(&key) {
            // WebVTT replaces an SRT pick for the same language/origin
            Some(existing)
                if existing.format == SubtitleFormat::Srt
                    && track.format == SubtitleFormat::Vtt =>
            {
                best.insert(key, track);
            }
            Some(_) => {}
            None => {
                best.insert(key, track);
            }
        }
    }

    // BTreeMap keys are (language, auto) with false < true, which is exactly
    // the required order
    best.into_values().collect()
}

fn subtitle_from_file(file: &FileEntry) -> Option<SubtitleTrack> {
    let lower = file.name.to_ascii_lowercase();
    let format = if lower.ends_with(".vtt") {
        SubtitleFormat::Vtt
    } else if lower.ends_with(".srt") {
        SubtitleFormat::Srt
    } else {
        return None;
    };

    let auto_generated = lower.contains(".autogenerated.") || lower.contains(".asr.");

    Some(SubtitleTrack {
        filename: file.name.clone(),
        language: language_from_name(&lower),
        format,
        auto_generated,
    })
}

/// Pull the language code out of a subtitle filename.
///
/// Names look like `movie.en.srt` or `movie.asr.en.vtt`; the code is the last
/// short alphabetic component before the extension. Files with no recognizable
/// code default to `"en"`, matching how the service labels untagged captions.
fn language_from_name(lower_name: &str) -> String {
    let stem = lower_name
        .rsplit_once('.')
        .map_or(lower_name, |(stem, _)| stem);

    for part in stem.rsplit('.') {
        if (2..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic()) {
            if part == "asr" {
                continue;
            }
            return part.to_string();
        }
        break;
    }
    "en".to_string()
}
