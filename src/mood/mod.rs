//! Mood inference layer.
//!
//! A text-generation provider abstraction (OpenAI-compatible backends) plus
//! the prompt template and the deterministic mood extraction applied to the
//! generated text.

mod infer;
mod openai;
mod provider;

pub use infer::{extract_mood, mood_prompt};
pub use openai::{ApiKeySource, OpenAiGenerator};
pub use provider::{GenerateError, GenerationOptions, TextGenerator};
