//! Remote URL construction
//!
//! The library service derives stream and thumbnail locations purely from
//! identifiers, so URLs are built locally instead of trusting per-file
//! metadata (per-file thumbnail URLs are known to be corrupt on the service).

use url::Url;

/// Base endpoints for the remote library service.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Metadata API base, e.g. `https://archive.org`
    pub api_base: Url,

    /// File download/stream base, e.g. `https://archive.org/download`
    pub download_base: Url,

    /// Thumbnail service base, e.g. `https://archive.org/services/img`
    pub thumbnail_base: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        // Statically valid URLs
        Self {
            api_base: Url::parse("https://archive.org").unwrap(),
            download_base: Url::parse("https://archive.org/download").unwrap(),
            thumbnail_base: Url::parse("https://archive.org/services/img").unwrap(),
        }
    }
}

impl Endpoints {
    /// Stream/download URL for a file: `{download_base}/{identifier}/{filename}`.
    ///
    /// Path segments are percent-encoded; the service rejects raw spaces and
    /// reserved characters in filenames.
    pub fn download_url(&self, identifier: &str, filename: &str) -> Url {
        let mut url = self.download_base.clone();
        url.path_segments_mut()
            .expect("download base is not a cannot-be-a-base URL")
            .pop_if_empty()
            .push(identifier)
            .push(filename);
        url
    }

    /// Thumbnail URL for an item: `{thumbnail_base}/{identifier}`.
    pub fn thumbnail_url(&self, identifier: &str) -> Url {
        let mut url = self.thumbnail_base.clone();
        url.path_segments_mut()
            .expect("thumbnail base is not a cannot-be-a-base URL")
            .pop_if_empty()
            .push(identifier);
        url
    }

    /// Metadata endpoint for an item: `{api_base}/metadata/{identifier}`.
    pub fn metadata_url(&self, identifier: &str) -> Url {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .expect("api base is not a cannot-be-a-base URL")
            .pop_if_empty()
            .push("metadata")
            .push(identifier);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_download_url() {
        let endpoints = Endpoints::default();
        let url = endpoints.download_url("gd1977-05-08", "gd77-05-08d1t01.mp3");
        assert_eq!(
            url.as_str(),
            "https://archive.org/download/gd1977-05-08/gd77-05-08d1t01.mp3"
        );
    }

    #[test]
    fn percent_encodes_path_segments() {
        let endpoints = Endpoints::default();
        let url = endpoints.download_url("some item", "disc 1/track.mp3");
        assert_eq!(
            url.as_str(),
            "https://archive.org/download/some%20item/disc%201%2Ftrack.mp3"
        );
    }

    #[test]
    fn builds_thumbnail_and_metadata_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.thumbnail_url("night-of-the-living-dead").as_str(),
            "https://archive.org/services/img/night-of-the-living-dead"
        );
        assert_eq!(
            endpoints.metadata_url("night-of-the-living-dead").as_str(),
            "https://archive.org/metadata/night-of-the-living-dead"
        );
    }
}
