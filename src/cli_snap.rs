//! One-shot CLI: caption a local image, infer the mood, look up tracks per
//! language, and print the social share content. Useful for poking at the
//! configured providers without running the server.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snaptune_server::config::{AppConfig, CliConfig, FileConfig};
use snaptune_server::mood::{GenerationOptions, OpenAiGenerator};
use snaptune_server::music::SpotifyClient;
use snaptune_server::pipeline::{LookupOutcome, SnapPipeline};
use snaptune_server::InferenceCaptioner;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the image file to analyze.
    pub image: PathBuf,

    /// Path to an optional TOML config file. File values override CLI values.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// URL of the image-captioning inference endpoint.
    #[clap(long)]
    pub captioner_url: Option<String>,

    /// Base URL of the OpenAI-compatible text-generation API.
    #[clap(long)]
    pub mood_url: Option<String>,

    /// Model used for mood generation.
    #[clap(long, default_value = "distilgpt2")]
    pub mood_model: String,

    /// Print the full report as JSON instead of plain text.
    #[clap(long)]
    pub json: bool,
}

fn guess_mime(path: &PathBuf) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        captioner_url: cli_args.captioner_url.clone(),
        captioner_timeout_sec: 60,
        mood_url: cli_args.mood_url.clone(),
        mood_model: cli_args.mood_model.clone(),
        mood_max_tokens: 20,
        mood_temperature: 0.8,
        mood_timeout_sec: 120,
        spotify_timeout_sec: 30,
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let image = std::fs::read(&cli_args.image)
        .with_context(|| format!("Failed to read image file: {:?}", cli_args.image))?;
    let mime = guess_mime(&cli_args.image);

    let pipeline = SnapPipeline::new(
        Arc::new(InferenceCaptioner::new(&config.captioner)),
        Arc::new(OpenAiGenerator::from_settings(&config.mood)),
        Arc::new(SpotifyClient::new(&config.spotify)),
        GenerationOptions::from(&config.mood),
    );

    let report = pipeline.run(&image, mime).await?;

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Caption: {}", report.caption);
    println!("Mood:    {}", report.mood);
    println!();
    for lookup in &report.lookups {
        match &lookup.outcome {
            LookupOutcome::Found { track } => {
                println!(
                    "{}: {} - {} ({})",
                    lookup.language, track.name, track.artist, track.url
                );
            }
            LookupOutcome::NotFound => println!("{}: no result found", lookup.language),
            LookupOutcome::Failed { message } => {
                println!("{}: lookup failed: {}", lookup.language, message)
            }
        }
    }
    println!();
    println!("Caption line: {}", report.social.caption_line);
    println!("Hashtags:     {}", report.social.hashtag_line);
    println!("Quote:        {}", report.social.quote);

    Ok(())
}
