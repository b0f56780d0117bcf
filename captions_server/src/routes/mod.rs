//! Captions API HTTP routes.

pub mod subs;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::CaptionsConfig;
use crate::error::ApiError;
use crate::models::transcript::TranscriptResponse;
use crate::services::transcript_service;
use crate::services::vtt::FlattenOptions;
use crate::services::ytdlp::CaptionSource;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CaptionsConfig>,
    pub source: Arc<dyn CaptionSource>,
    /// Bounds concurrent yt-dlp work across requests.
    pub fetch_permits: Arc<Semaphore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: CaptionsConfig, source: Arc<dyn CaptionSource>) -> Self {
        let fetch_permits = Arc::new(Semaphore::new(config.max_concurrent_fetches));
        Self {
            config: Arc::new(config),
            source,
            fetch_permits,
            started_at: Instant::now(),
        }
    }
}

/// Build the service router.
pub fn app_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/subs", get(subs_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

// ── Subtitles ──

async fn subs_handler(
    State(state): State<AppState>,
    query: Result<Query<subs::SubsQuery>, QueryRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        let err = ApiError::Unprocessable(rejection.body_text());
        crate::metrics::subs_request(err.status_code().as_str());
        err
    })?;

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("subs", %request_id, video_id = ?query.video_id);

    let result = fetch_subs(&state, &query).instrument(span).await;
    match &result {
        Ok(_) => crate::metrics::subs_request("ok"),
        Err(e) => crate::metrics::subs_request(e.status_code().as_str()),
    }
    result.map(Json)
}

async fn fetch_subs(
    state: &AppState,
    query: &subs::SubsQuery,
) -> Result<TranscriptResponse, ApiError> {
    let video_id = query.video_id()?;
    let lang = query.lang(&state.config.default_lang);

    let _permit = state
        .fetch_permits
        .acquire()
        .await
        .map_err(|_| ApiError::ServiceUnavailable("Server is shutting down".to_string()))?;

    let response = transcript_service::fetch_transcript(
        state.source.as_ref(),
        &state.config.work_dir,
        video_id,
        lang,
        FlattenOptions {
            dedupe: query.dedupe,
        },
    )
    .await?;

    tracing::info!(
        used_lang = %response.used_lang,
        used_type = response.used_type.as_str(),
        chars = response.chars,
        "Transcript served"
    );
    Ok(response)
}

// ── Health ──

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub ytdlp_bin: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        ytdlp_bin: state.config.ytdlp_bin.clone(),
    })
}
