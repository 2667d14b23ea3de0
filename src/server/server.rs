use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::error;

use crate::pipeline::{SnapPipeline, SnapReport};

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

/// Uploads larger than this are rejected outright.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn analyze(
    State(pipeline): State<GuardedPipeline>,
    mut multipart: Multipart,
) -> Response {
    let mut image: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Malformed multipart: {}", e))
                    .into_response()
            }
        };

        if field.name() != Some("image") {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        match field.bytes().await {
            Ok(bytes) => image = Some((bytes.to_vec(), mime)),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read image field: {}", e),
                )
                    .into_response()
            }
        }
    }

    let Some((bytes, mime)) = image else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing multipart field 'image'".to_string(),
        )
            .into_response();
    };

    if bytes.is_empty() {
        return (StatusCode::BAD_REQUEST, "Empty image upload".to_string()).into_response();
    }

    match pipeline.run(&bytes, &mime).await {
        Ok(report) => Json::<SnapReport>(report).into_response(),
        // Captioning or mood generation failed; the whole run is aborted.
        Err(e) => {
            error!("Pipeline run failed: {:#}", e);
            (StatusCode::BAD_GATEWAY, format!("{:#}", e)).into_response()
        }
    }
}

pub fn make_app(config: ServerConfig, pipeline: Arc<SnapPipeline>) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        pipeline,
        hash: env!("GIT_HASH").to_string(),
    };

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    pipeline: Arc<SnapPipeline>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, pipeline);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
