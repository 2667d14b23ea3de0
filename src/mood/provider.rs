//! Text generator trait definition.

use crate::config::MoodSettings;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a generation request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_tokens: 20,
            timeout: Duration::from_secs(120),
        }
    }
}

impl From<&MoodSettings> for GenerationOptions {
    fn from(settings: &MoodSettings) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: settings.timeout,
        }
    }
}

/// Errors that can occur when interacting with a text-generation provider.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

/// Trait for text-generation providers.
///
/// Implementations of this trait can connect to different backends while
/// providing a unified prompt-in, text-out interface.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider's name (e.g., "openai").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Generate a free-form continuation of the prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerateError>;

    /// Check if the provider is healthy and reachable.
    async fn health_check(&self) -> Result<(), GenerateError>;
}
