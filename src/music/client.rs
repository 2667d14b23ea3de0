//! HTTP client for the Spotify Web API.

use super::models::{ApiSearchResponse, ApiTokenResponse, Track};
use super::{MusicError, MusicSearch};
use crate::config::SpotifySettings;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Refresh the bearer token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Music search client backed by the Spotify Web API.
///
/// Authenticates with the client-credentials flow; the bearer token is
/// refreshed lazily when it is close to expiry. Search results are never
/// cached.
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Create a new Spotify client from resolved settings.
    ///
    /// Credentials come in with the settings; the client never reads the
    /// process environment.
    pub fn new(settings: &SpotifySettings) -> Self {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    /// Get a valid bearer token, fetching a fresh one if needed.
    async fn bearer_token(&self) -> Result<String, MusicError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.value.clone());
            }
        }

        debug!("Fetching new client-credentials token");
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MusicError::Timeout
                } else {
                    MusicError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MusicError::Auth(format!(
                "Token request failed with status {}: {}",
                status, body
            )));
        }

        let token: ApiTokenResponse = response.json().await.map_err(|e| {
            MusicError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;

        let expires_at = Instant::now()
            + Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token;
        *guard = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }
}

#[async_trait]
impl MusicSearch for SpotifyClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, MusicError> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/search?q={}&type=track&limit={}",
            self.api_url,
            urlencoding::encode(query),
            limit
        );

        debug!(query = %query, limit, "Searching tracks");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MusicError::Timeout
                } else {
                    MusicError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MusicError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ApiSearchResponse = response.json().await.map_err(|e| {
            MusicError::InvalidResponse(format!("Failed to parse search response: {}", e))
        })?;

        Ok(parsed
            .tracks
            .items
            .into_iter()
            .map(|t| t.into_track())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotifySettings;
    use axum::extract::{Query, State};
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct StubState {
        token_requests: Arc<AtomicUsize>,
        expires_in: u64,
    }

    async fn token(State(state): State<StubState>) -> Json<serde_json::Value> {
        let n = state.token_requests.fetch_add(1, Ordering::SeqCst);
        Json(serde_json::json!({
            "access_token": format!("token-{}", n),
            "expires_in": state.expires_in,
        }))
    }

    /// Echoes the bearer token and query parameters back as track fields so
    /// tests can assert on what the client actually sent.
    async fn search(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(serde_json::json!({
            "tracks": {
                "items": [{
                    "name": params.get("q").cloned().unwrap_or_default(),
                    "artists": [{"name": auth}],
                    "external_urls": {
                        "spotify": format!(
                            "type={};limit={}",
                            params.get("type").cloned().unwrap_or_default(),
                            params.get("limit").cloned().unwrap_or_default(),
                        )
                    }
                }]
            }
        }))
    }

    async fn spawn_stub(expires_in: u64) -> (String, Arc<AtomicUsize>) {
        let token_requests = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            token_requests: token_requests.clone(),
            expires_in,
        };
        let app = Router::new()
            .route("/token", post(token))
            .route("/search", get(search))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });

        (base_url, token_requests)
    }

    fn settings(base_url: &str) -> SpotifySettings {
        SpotifySettings {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            api_url: base_url.to_string(),
            token_url: format!("{}/token", base_url),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_one_token_fetch_serves_multiple_searches() {
        let (base_url, token_requests) = spawn_stub(3600).await;
        let client = SpotifyClient::new(&settings(&base_url));

        let first = client.search("happy jazz telugu music", 1).await.unwrap();
        let second = client.search("happy jazz hindi music", 1).await.unwrap();

        assert_eq!(token_requests.load(Ordering::SeqCst), 1);
        assert_eq!(first[0].artist, "Bearer token-0");
        assert_eq!(second[0].artist, "Bearer token-0");
    }

    #[tokio::test]
    async fn test_search_url_carries_query_type_and_limit() {
        let (base_url, _) = spawn_stub(3600).await;
        let client = SpotifyClient::new(&settings(&base_url));

        let tracks = client.search("calm piano english music", 1).await.unwrap();

        // The query survives the urlencoding round-trip intact
        assert_eq!(tracks[0].name, "calm piano english music");
        assert_eq!(tracks[0].url, "type=track;limit=1");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        // expires_in within the refresh margin, so every search refetches
        let (base_url, token_requests) = spawn_stub(0).await;
        let client = SpotifyClient::new(&settings(&base_url));

        let first = client.search("lofi telugu music", 1).await.unwrap();
        let second = client.search("lofi tamil music", 1).await.unwrap();

        assert_eq!(token_requests.load(Ordering::SeqCst), 2);
        assert_eq!(first[0].artist, "Bearer token-0");
        assert_eq!(second[0].artist, "Bearer token-1");
    }

    #[tokio::test]
    async fn test_token_failure_surfaces_as_auth_error() {
        let (base_url, _) = spawn_stub(3600).await;
        let mut settings = settings(&base_url);
        settings.token_url = format!("{}/missing", base_url);
        let client = SpotifyClient::new(&settings);

        let err = client.search("anything", 1).await.unwrap_err();
        assert!(matches!(err, MusicError::Auth(_)));
    }
}
