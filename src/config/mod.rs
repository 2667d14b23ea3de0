mod file_config;

pub use file_config::{CaptionerConfig, FileConfig, MoodConfig, SpotifyConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use std::time::Duration;

pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub captioner_url: Option<String>,
    pub captioner_timeout_sec: u64,
    pub mood_url: Option<String>,
    pub mood_model: String,
    pub mood_max_tokens: u32,
    pub mood_temperature: f32,
    pub mood_timeout_sec: u64,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub captioner: CaptionerSettings,
    pub mood: MoodSettings,
    pub spotify: SpotifySettings,
}

/// Settings for the image-captioning inference endpoint.
#[derive(Debug, Clone)]
pub struct CaptionerSettings {
    pub url: String,
    pub timeout: Duration,
}

/// Settings for the mood text-generation backend (OpenAI-compatible).
#[derive(Debug, Clone)]
pub struct MoodSettings {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Credentials and endpoints for the music search API.
///
/// Credentials are carried explicitly here and handed to the client at
/// construction time; nothing reads the process environment after resolve.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present; Spotify credentials fall
    /// back to the process environment as a last resort.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let cap_file = file.captioner.unwrap_or_default();
        let captioner_url = cap_file
            .url
            .or_else(|| cli.captioner_url.clone())
            .map(|u| u.trim_end_matches('/').to_string());
        let Some(captioner_url) = captioner_url else {
            bail!("Captioner endpoint must be specified via --captioner-url or in config file");
        };
        let captioner = CaptionerSettings {
            url: captioner_url,
            timeout: Duration::from_secs(
                cap_file.timeout_sec.unwrap_or(cli.captioner_timeout_sec),
            ),
        };

        let mood_file = file.mood.unwrap_or_default();
        let mood_url = mood_file
            .url
            .or_else(|| cli.mood_url.clone())
            .map(|u| u.trim_end_matches('/').to_string());
        let Some(mood_url) = mood_url else {
            bail!("Mood generator endpoint must be specified via --mood-url or in config file");
        };
        if mood_file.api_key.is_some() && mood_file.api_key_command.is_some() {
            bail!("mood.api_key and mood.api_key_command are mutually exclusive");
        }
        let mood = MoodSettings {
            url: mood_url,
            model: mood_file.model.unwrap_or_else(|| cli.mood_model.clone()),
            api_key: mood_file.api_key,
            api_key_command: mood_file.api_key_command,
            max_tokens: mood_file.max_tokens.unwrap_or(cli.mood_max_tokens),
            temperature: mood_file.temperature.unwrap_or(cli.mood_temperature),
            timeout: Duration::from_secs(mood_file.timeout_sec.unwrap_or(cli.mood_timeout_sec)),
        };

        let sp_file = file.spotify.unwrap_or_default();
        let client_id = sp_file
            .client_id
            .or_else(|| cli.spotify_client_id.clone())
            .or_else(|| std::env::var(SPOTIFY_CLIENT_ID_ENV).ok());
        let client_secret = sp_file
            .client_secret
            .or_else(|| cli.spotify_client_secret.clone())
            .or_else(|| std::env::var(SPOTIFY_CLIENT_SECRET_ENV).ok());
        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            bail!(
                "Spotify credentials must be specified via config file, CLI, or the {}/{} environment variables",
                SPOTIFY_CLIENT_ID_ENV,
                SPOTIFY_CLIENT_SECRET_ENV
            );
        };
        let spotify = SpotifySettings {
            client_id,
            client_secret,
            api_url: sp_file
                .api_url
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            token_url: sp_file
                .token_url
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            timeout: Duration::from_secs(sp_file.timeout_sec.unwrap_or(cli.spotify_timeout_sec)),
        };

        Ok(Self {
            port,
            logging_level,
            captioner,
            mood,
            spotify,
        })
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    match s.to_lowercase().as_str() {
        "none" => Some(RequestsLoggingLevel::None),
        "path" => Some(RequestsLoggingLevel::Path),
        "headers" => Some(RequestsLoggingLevel::Headers),
        "body" => Some(RequestsLoggingLevel::Body),
        _ => None,
    }
}
