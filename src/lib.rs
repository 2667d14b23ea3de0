//! SnapTune Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod captioner;
pub mod config;
pub mod mood;
pub mod music;
pub mod pipeline;
pub mod server;
pub mod social;

// Re-export commonly used types for convenience
pub use captioner::{CaptionError, Captioner, InferenceCaptioner};
pub use mood::{extract_mood, GenerateError, GenerationOptions, OpenAiGenerator, TextGenerator};
pub use music::{MusicError, MusicSearch, SpotifyClient, Track};
pub use pipeline::{Language, LanguageLookup, LookupOutcome, SnapPipeline, SnapReport};
pub use server::{run_server, RequestsLoggingLevel};
pub use social::SocialContent;
