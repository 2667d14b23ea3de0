//! Models for the music search API responses.
//!
//! The `Api*` types match the JSON structure returned by the Spotify Web API
//! and include conversion to the minimal `Track` record the pipeline uses.

use serde::{Deserialize, Serialize};

/// Minimal track metadata surfaced by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub url: String,
}

// =============================================================================
// Spotify API Response Types
// =============================================================================

/// Token response from the client-credentials endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ApiTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Top-level search response.
#[derive(Debug, Deserialize)]
pub(super) struct ApiSearchResponse {
    pub tracks: ApiTrackPage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiTrackPage {
    pub items: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiTrack {
    pub name: String,
    pub artists: Vec<ApiArtist>,
    pub external_urls: ApiExternalUrls,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct ApiExternalUrls {
    pub spotify: Option<String>,
}

impl ApiTrack {
    /// Convert to the pipeline's Track model.
    ///
    /// The first listed artist is taken as the display artist; a missing
    /// external URL becomes an empty string rather than dropping the track.
    pub fn into_track(self) -> Track {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        Track {
            name: self.name,
            artist,
            url: self.external_urls.spotify.unwrap_or_default(),
        }
    }
}
