//! OpenAI-compatible text-generation provider implementation.
//!
//! Works with OpenAI, OpenRouter, vLLM, llama.cpp server, and any other
//! service implementing the OpenAI completions API.

use super::provider::{GenerateError, GenerationOptions, TextGenerator};
use crate::config::MoodSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Timeout for api_key_command execution.
const API_KEY_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of API key for authentication.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// No authentication.
    None,
    /// Static API key.
    Static(String),
    /// Shell command that outputs the API key (for rotating tokens).
    Command(String),
}

impl ApiKeySource {
    /// Get the current API key, executing the command if necessary.
    async fn get_key(&self) -> Result<Option<String>, GenerateError> {
        match self {
            ApiKeySource::None => Ok(None),
            ApiKeySource::Static(key) => Ok(Some(key.clone())),
            ApiKeySource::Command(cmd) => {
                debug!(command = %cmd, "Fetching API key via command");

                let result = tokio::time::timeout(
                    API_KEY_COMMAND_TIMEOUT,
                    Command::new("sh").arg("-c").arg(cmd).output(),
                )
                .await;

                let output = match result {
                    Ok(Ok(output)) => output,
                    Ok(Err(e)) => {
                        warn!(command = %cmd, error = %e, "api_key_command failed to execute");
                        return Err(GenerateError::Connection(format!(
                            "Failed to execute api_key_command: {}",
                            e
                        )));
                    }
                    Err(_) => {
                        warn!(command = %cmd, "api_key_command timed out");
                        return Err(GenerateError::Timeout);
                    }
                };

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(command = %cmd, stderr = %stderr, "api_key_command failed");
                    return Err(GenerateError::Connection(format!(
                        "api_key_command failed with status {}: {}",
                        output.status, stderr
                    )));
                }

                let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if key.is_empty() {
                    warn!(command = %cmd, "api_key_command returned empty key");
                    return Err(GenerateError::Connection(
                        "api_key_command returned empty key".to_string(),
                    ));
                }

                Ok(Some(key))
            }
        }
    }
}

/// OpenAI-compatible text-generation provider.
///
/// Connects to any service implementing the OpenAI completions API and sends
/// plain-prompt completion requests.
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key_source: ApiKeySource,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiGenerator {
    /// Create a new OpenAI-compatible generator.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1").
    /// * `model` - Model to use (e.g., "gpt-3.5-turbo-instruct", "distilgpt2").
    /// * `api_key_source` - Where to get the API key from, if any.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_source: ApiKeySource,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            model: model.into(),
            api_key_source,
        }
    }

    /// Create a generator straight from resolved mood settings.
    pub fn from_settings(settings: &MoodSettings) -> Self {
        let api_key_source = match (&settings.api_key, &settings.api_key_command) {
            (Some(key), _) => ApiKeySource::Static(key.clone()),
            (None, Some(cmd)) => ApiKeySource::Command(cmd.clone()),
            (None, None) => ApiKeySource::None,
        };
        Self::new(settings.url.clone(), settings.model.clone(), api_key_source)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerateError> {
        let url = format!("{}/completions", self.base_url);

        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let mut builder = self.client.post(&url).json(&request).timeout(options.timeout);
        if let Some(key) = self.api_key_source.get_key().await? {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerateError::Timeout
            } else {
                GenerateError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GenerateError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            GenerateError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| {
                GenerateError::InvalidResponse("Completion returned no choices".to_string())
            })?;

        debug!(generated_len = text.len(), "Received completion");
        Ok(text)
    }

    async fn health_check(&self) -> Result<(), GenerateError> {
        let url = format!("{}/models", self.base_url);

        let mut builder = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5));
        if let Some(key) = self.api_key_source.get_key().await? {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GenerateError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GenerateError::Api {
                status: status.as_u16(),
                message: "Generator health check failed".to_string(),
            })
        }
    }
}
