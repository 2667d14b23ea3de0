//! Stub provider implementations
//!
//! These stand in for the external captioning, generation, and music search
//! services so the e2e suite never touches the network.

use async_trait::async_trait;
use snaptune_server::captioner::{CaptionError, Captioner};
use snaptune_server::mood::{GenerateError, GenerationOptions, TextGenerator};
use snaptune_server::music::{MusicError, MusicSearch, Track};

/// Captioner returning a fixed caption, or failing when `caption` is None.
pub struct StubCaptioner {
    pub caption: Option<String>,
}

impl StubCaptioner {
    pub fn fixed(caption: &str) -> Self {
        Self {
            caption: Some(caption.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { caption: None }
    }
}

#[async_trait]
impl Captioner for StubCaptioner {
    fn name(&self) -> &str {
        "stub"
    }

    async fn caption(&self, _image: &[u8], _mime: &str) -> Result<String, CaptionError> {
        match &self.caption {
            Some(caption) => Ok(caption.clone()),
            None => Err(CaptionError::Connection("stub captioner down".to_string())),
        }
    }

    async fn health_check(&self) -> Result<(), CaptionError> {
        Ok(())
    }
}

/// Generator returning fixed text, or failing when `text` is None.
pub struct StubGenerator {
    pub text: Option<String>,
}

impl StubGenerator {
    pub fn fixed(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerateError> {
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(GenerateError::Connection("stub generator down".to_string())),
        }
    }

    async fn health_check(&self) -> Result<(), GenerateError> {
        Ok(())
    }
}

/// Music search stub with per-query behavior.
///
/// Queries containing a substring listed in `fail_on` error out; queries
/// containing a substring in `empty_on` return no tracks; everything else
/// returns a single deterministic track derived from the query.
#[derive(Default)]
pub struct StubMusic {
    pub fail_on: Vec<&'static str>,
    pub empty_on: Vec<&'static str>,
}

#[async_trait]
impl MusicSearch for StubMusic {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, MusicError> {
        if self.fail_on.iter().any(|s| query.contains(s)) {
            return Err(MusicError::Api {
                status: 500,
                message: "stub backend error".to_string(),
            });
        }
        if self.empty_on.iter().any(|s| query.contains(s)) {
            return Ok(vec![]);
        }
        let track = Track {
            name: format!("Stub track for '{}'", query),
            artist: "Stub Artist".to_string(),
            url: "https://open.spotify.com/track/stub".to_string(),
        };
        Ok(vec![track; limit.min(1)])
    }
}
