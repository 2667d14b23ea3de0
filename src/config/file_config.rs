use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Provider sections
    pub captioner: Option<CaptionerConfig>,
    pub mood: Option<MoodConfig>,
    pub spotify: Option<SpotifyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CaptionerConfig {
    pub url: Option<String>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MoodConfig {
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Shell command that prints the API key (for rotating tokens).
    pub api_key_command: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: Option<String>,
    pub token_url: Option<String>,
    pub timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            port = 8080

            [captioner]
            url = "http://captioner:8000"

            [spotify]
            client_id = "abc"
            "#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(
            config.captioner.unwrap().url.as_deref(),
            Some("http://captioner:8000")
        );
        assert_eq!(config.spotify.unwrap().client_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = FileConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config: FileConfig = toml::from_str("[something_else]\nfoo = 1\n").unwrap();
        assert!(config.port.is_none());
    }
}
