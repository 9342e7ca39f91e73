//! Library service client
//!
//! Thin metadata client over `reqwest`. Status codes are mapped into the
//! [`ClientError`] taxonomy in one place so the retry policy can classify
//! every failure consistently.

use crate::error::{ClientError, Result};
use reqwest::{Client, StatusCode};
use stacks_core::{
    select_subtitle_tracks, sort_tracks, AudioTrack, Endpoints, ItemMetadata, SubtitleTrack,
};
use std::time::Duration;
use tracing::{debug, info};

/// Audio formats the player can stream directly.
const PLAYABLE_AUDIO_FORMATS: &[&str] = &["VBR MP3", "MP3", "Ogg Vorbis", "Flac"];

/// Client for the library service metadata API.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    http: Client,
    endpoints: Endpoints,
}

impl LibraryClient {
    /// Create a client against the default public endpoints.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(Endpoints::default())
    }

    /// Create a client against custom endpoints (tests, mirrors).
    pub fn with_endpoints(endpoints: Endpoints) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Stacks/{} (tvOS)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http, endpoints })
    }

    /// The endpoints this client resolves against.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch full metadata (item details + file listing) for an identifier.
    pub async fn item_metadata(&self, identifier: &str) -> Result<ItemMetadata> {
        let url = self.endpoints.metadata_url(identifier);
        debug!(url = %url, "Fetching item metadata");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_error_status(status, identifier, response.text().await.ok()));
        }

        let metadata: ItemMetadata = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        // The service answers 200 with an empty object for unknown items
        if metadata.metadata.identifier.is_empty() {
            return Err(ClientError::NotFound(identifier.to_string()));
        }

        info!(
            identifier = %metadata.metadata.identifier,
            files = metadata.files.len(),
            "Fetched item metadata"
        );
        Ok(metadata)
    }

    /// Build the ordered audio track list for an item.
    ///
    /// Only playable audio formats are kept; tracks come back sorted by
    /// track number with unnumbered tracks last.
    pub async fn audio_tracks(&self, identifier: &str) -> Result<Vec<AudioTrack>> {
        let metadata = self.item_metadata(identifier).await?;
        Ok(self.tracks_from_metadata(&metadata))
    }

    /// Assemble audio tracks from already-fetched metadata.
    pub fn tracks_from_metadata(&self, metadata: &ItemMetadata) -> Vec<AudioTrack> {
        let mut tracks: Vec<AudioTrack> = metadata
            .files
            .iter()
            .filter(|file| {
                file.format
                    .as_deref()
                    .is_some_and(|f| PLAYABLE_AUDIO_FORMATS.contains(&f))
            })
            .map(|file| AudioTrack::from_file(file, &metadata.metadata, &self.endpoints))
            .collect();
        sort_tracks(&mut tracks);
        tracks
    }

    /// Discover subtitle tracks for an item's file listing.
    ///
    /// Best-effort: callers treat failures as "no subtitles" and continue.
    pub fn subtitle_tracks(&self, metadata: &ItemMetadata) -> Vec<SubtitleTrack> {
        select_subtitle_tracks(&metadata.files)
    }
}

fn map_error_status(status: StatusCode, identifier: &str, body: Option<String>) -> ClientError {
    let message = body.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::InvalidCredentials,
        StatusCode::NOT_FOUND => ClientError::NotFound(identifier.to_string()),
        _ => ClientError::ServerError {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses_into_taxonomy() {
        assert!(matches!(
            map_error_status(StatusCode::UNAUTHORIZED, "x", None),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            map_error_status(StatusCode::NOT_FOUND, "x", None),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::SERVICE_UNAVAILABLE, "x", None),
            ClientError::ServerError { status: 503, .. }
        ));
    }
}
