//! Captioner trait definition.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a captioning backend.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for image captioning providers.
///
/// Implementations take raw image bytes and return a one-line natural
/// language description of the image.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Get the provider's name (e.g., "inference-endpoint").
    fn name(&self) -> &str;

    /// Caption an image.
    ///
    /// # Arguments
    /// * `image` - Raw image bytes as uploaded.
    /// * `mime` - MIME type of the image (e.g., "image/jpeg").
    async fn caption(&self, image: &[u8], mime: &str) -> Result<String, CaptionError>;

    /// Check if the provider is healthy and reachable.
    async fn health_check(&self) -> Result<(), CaptionError>;
}
