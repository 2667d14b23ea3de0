//! Test server lifecycle management
//!
//! Spawns the real axum app on a random port with stub providers wired into
//! the pipeline, so every test runs against an isolated, network-free server.

use super::stubs::{StubCaptioner, StubGenerator, StubMusic};
use snaptune_server::captioner::Captioner;
use snaptune_server::mood::{GenerationOptions, TextGenerator};
use snaptune_server::music::MusicSearch;
use snaptune_server::pipeline::SnapPipeline;
use snaptune_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance backed by stub providers
///
/// When dropped, the server task shuts down with the runtime.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a test server with well-behaved stub providers.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            StubCaptioner::fixed("a dog at sunset on the beach"),
            StubGenerator::fixed("Mood: happy acoustic"),
            StubMusic::default(),
        )
        .await
    }

    /// Spawns a test server with full request/response body logging, to make
    /// sure the logging middleware leaves traffic intact.
    pub async fn spawn_verbose() -> Self {
        Self::spawn_inner(
            StubCaptioner::fixed("a dog at sunset on the beach"),
            StubGenerator::fixed("Mood: happy acoustic"),
            StubMusic::default(),
            RequestsLoggingLevel::Body,
        )
        .await
    }

    /// Spawns a test server with the given provider stubs.
    pub async fn spawn_with(
        captioner: StubCaptioner,
        generator: StubGenerator,
        music: StubMusic,
    ) -> Self {
        Self::spawn_inner(captioner, generator, music, RequestsLoggingLevel::None).await
    }

    async fn spawn_inner(
        captioner: StubCaptioner,
        generator: StubGenerator,
        music: StubMusic,
        requests_logging_level: RequestsLoggingLevel,
    ) -> Self {
        let pipeline = Arc::new(SnapPipeline::new(
            Arc::new(captioner) as Arc<dyn Captioner>,
            Arc::new(generator) as Arc<dyn TextGenerator>,
            Arc::new(music) as Arc<dyn MusicSearch>,
            GenerationOptions::default(),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level,
        };
        let app = make_app(config, pipeline);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Polls the health endpoint until the server accepts requests.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::new();
        let url = format!("{}/health", self.base_url);
        for _ in 0..50 {
            if let Ok(response) = client.get(&url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Test server did not become ready in time");
    }
}
