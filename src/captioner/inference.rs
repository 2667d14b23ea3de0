//! HTTP inference-endpoint captioner implementation.

use super::provider::{CaptionError, Captioner};
use crate::config::CaptionerSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Captioner backed by an HTTP image-captioning inference endpoint.
///
/// Posts the raw image bytes to the endpoint root and expects the usual
/// inference-server response shape: a JSON array of generations, each with a
/// `generated_text` field. The first generation is taken as the caption.
pub struct InferenceCaptioner {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

impl InferenceCaptioner {
    /// Create a new inference-endpoint captioner.
    pub fn new(settings: &CaptionerSettings) -> Self {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Captioner for InferenceCaptioner {
    fn name(&self) -> &str {
        "inference-endpoint"
    }

    async fn caption(&self, image: &[u8], mime: &str) -> Result<String, CaptionError> {
        debug!(
            bytes = image.len(),
            mime = %mime,
            "Sending captioning request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CaptionError::Timeout
                } else {
                    CaptionError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let generations: Vec<Generation> = response.json().await.map_err(|e| {
            CaptionError::InvalidResponse(format!("Failed to parse captioner response: {}", e))
        })?;

        let caption = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .ok_or_else(|| {
                CaptionError::InvalidResponse("Captioner returned no generations".to_string())
            })?;

        debug!(caption = %caption, "Received image caption");
        Ok(caption)
    }

    async fn health_check(&self) -> Result<(), CaptionError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CaptionError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CaptionError::Api {
                status: status.as_u16(),
                message: "Captioner health check failed".to_string(),
            })
        }
    }
}
