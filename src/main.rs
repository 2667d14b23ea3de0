use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snaptune_server::captioner::{Captioner, InferenceCaptioner};
use snaptune_server::config::{AppConfig, CliConfig, FileConfig};
use snaptune_server::mood::{GenerationOptions, OpenAiGenerator, TextGenerator};
use snaptune_server::music::SpotifyClient;
use snaptune_server::pipeline::SnapPipeline;
use snaptune_server::server::{run_server, RequestsLoggingLevel};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to an optional TOML config file. File values override CLI values.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// URL of the image-captioning inference endpoint.
    #[clap(long)]
    pub captioner_url: Option<String>,

    /// Timeout in seconds for captioning requests.
    #[clap(long, default_value_t = 60)]
    pub captioner_timeout_sec: u64,

    /// Base URL of the OpenAI-compatible text-generation API.
    #[clap(long)]
    pub mood_url: Option<String>,

    /// Model used for mood generation.
    #[clap(long, default_value = "distilgpt2")]
    pub mood_model: String,

    /// Maximum tokens to generate for the mood phrase.
    #[clap(long, default_value_t = 20)]
    pub mood_max_tokens: u32,

    /// Sampling temperature for mood generation.
    #[clap(long, default_value_t = 0.8)]
    pub mood_temperature: f32,

    /// Timeout in seconds for mood generation requests.
    #[clap(long, default_value_t = 120)]
    pub mood_timeout_sec: u64,

    /// Spotify client id (falls back to SPOTIFY_CLIENT_ID).
    #[clap(long)]
    pub spotify_client_id: Option<String>,

    /// Spotify client secret (falls back to SPOTIFY_CLIENT_SECRET).
    #[clap(long)]
    pub spotify_client_secret: Option<String>,

    /// Timeout in seconds for music search requests.
    #[clap(long, default_value_t = 30)]
    pub spotify_timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            logging_level: self.logging_level.clone(),
            captioner_url: self.captioner_url.clone(),
            captioner_timeout_sec: self.captioner_timeout_sec,
            mood_url: self.mood_url.clone(),
            mood_model: self.mood_model.clone(),
            mood_max_tokens: self.mood_max_tokens,
            mood_temperature: self.mood_temperature,
            mood_timeout_sec: self.mood_timeout_sec,
            spotify_client_id: self.spotify_client_id.clone(),
            spotify_client_secret: self.spotify_client_secret.clone(),
            spotify_timeout_sec: self.spotify_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let captioner = Arc::new(InferenceCaptioner::new(&config.captioner));
    let generator = Arc::new(OpenAiGenerator::from_settings(&config.mood));
    let music = Arc::new(SpotifyClient::new(&config.spotify));

    // Best-effort startup checks; the providers may come up later.
    if let Err(e) = captioner.health_check().await {
        warn!("Captioner not reachable at startup: {}", e);
    }
    if let Err(e) = generator.health_check().await {
        warn!("Mood generator not reachable at startup: {}", e);
    }

    let generation_options = GenerationOptions::from(&config.mood);
    let pipeline = Arc::new(SnapPipeline::new(
        captioner,
        generator,
        music,
        generation_options,
    ));

    info!("Starting SnapTune server on port {}...", config.port);
    run_server(pipeline, config.logging_level, config.port).await
}
