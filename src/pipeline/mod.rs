//! The photo-to-music pipeline.
//!
//! Strictly linear, single pass per uploaded image: caption the image, infer
//! a mood phrase from generated text, look up one track per language, then
//! derive the social share content. No stage feeds back into an earlier one
//! and nothing is carried over between runs.

use crate::captioner::Captioner;
use crate::mood::{extract_mood, mood_prompt, GenerationOptions, TextGenerator};
use crate::music::{MusicSearch, Track};
use crate::social::SocialContent;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed language categories used to diversify search results.
///
/// The order is display order, nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Language {
    Telugu,
    Hindi,
    English,
    Tamil,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Telugu,
        Language::Hindi,
        Language::English,
        Language::Tamil,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Tamil => "Tamil",
        }
    }

    /// Lowercase form used when building search queries.
    pub fn search_term(&self) -> &'static str {
        match self {
            Language::Telugu => "telugu",
            Language::Hindi => "hindi",
            Language::English => "english",
            Language::Tamil => "tamil",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Build the search query for one language.
pub fn build_query(mood: &str, language: Language) -> String {
    format!("{} {} music", mood, language.search_term())
}

/// Outcome of a single per-language lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found { track: Track },
    NotFound,
    Failed { message: String },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }
}

/// One language's lookup result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LanguageLookup {
    pub language: Language,
    #[serde(flatten)]
    pub outcome: LookupOutcome,
}

/// Everything the pipeline produces for one uploaded image.
#[derive(Clone, Debug, Serialize)]
pub struct SnapReport {
    pub caption: String,
    pub mood: String,
    pub lookups: Vec<LanguageLookup>,
    pub social: SocialContent,
}

/// The pipeline itself: three external capabilities wired in at construction.
pub struct SnapPipeline {
    captioner: Arc<dyn Captioner>,
    generator: Arc<dyn TextGenerator>,
    music: Arc<dyn MusicSearch>,
    generation_options: GenerationOptions,
}

impl SnapPipeline {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        generator: Arc<dyn TextGenerator>,
        music: Arc<dyn MusicSearch>,
        generation_options: GenerationOptions,
    ) -> Self {
        Self {
            captioner,
            generator,
            music,
            generation_options,
        }
    }

    /// Run the full pipeline on one uploaded image.
    ///
    /// Captioning and mood generation failures abort the whole run; a failed
    /// per-language lookup only marks that language and the others proceed.
    pub async fn run(&self, image: &[u8], mime: &str) -> Result<SnapReport> {
        let caption = self
            .captioner
            .caption(image, mime)
            .await
            .context("Image captioning failed")?;
        info!(caption = %caption, "Generated image caption");

        let generated = self
            .generator
            .generate(&mood_prompt(&caption), &self.generation_options)
            .await
            .context("Mood generation failed")?;
        let mood = extract_mood(&generated);
        info!(mood = %mood, "Inferred mood");

        let lookups = self.lookup_tracks(&mood).await;
        let social = SocialContent::derive(&caption);

        Ok(SnapReport {
            caption,
            mood,
            lookups,
            social,
        })
    }

    /// Look up the first matching track for every language.
    ///
    /// Lookups are independent; one failing backend call must not take the
    /// other languages down with it.
    pub async fn lookup_tracks(&self, mood: &str) -> Vec<LanguageLookup> {
        let mut lookups = Vec::with_capacity(Language::ALL.len());
        for language in Language::ALL {
            let query = build_query(mood, language);
            let outcome = match self.music.search(&query, 1).await {
                Ok(tracks) => match tracks.into_iter().next() {
                    Some(track) => LookupOutcome::Found { track },
                    None => {
                        info!(%language, query = %query, "No track found");
                        LookupOutcome::NotFound
                    }
                },
                Err(e) => {
                    warn!(%language, query = %query, error = %e, "Track lookup failed");
                    LookupOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            lookups.push(LanguageLookup { language, outcome });
        }
        lookups
    }
}
