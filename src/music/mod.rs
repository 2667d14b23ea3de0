//! Music search abstraction and the Spotify-backed implementation.

mod client;
mod models;

pub use client::SpotifyClient;
pub use models::Track;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the music search backend.
#[derive(Debug, Error)]
pub enum MusicError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for music search backends.
///
/// Implementations return up to `limit` tracks matching the free-text query,
/// best match first.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MusicSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, MusicError>;
}
