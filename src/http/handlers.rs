use super::state::AppState;
use crate::job::{JobParams, SubtitleMode};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    /// Original name of the uploaded file (output artifacts are named after
    /// its stem).
    pub file_name: String,

    /// Where the source file already lives on local storage.
    pub file_path: PathBuf,

    pub target_languages: Vec<String>,

    #[serde(default = "default_whisper_model")]
    pub whisper_model: String,

    #[serde(default = "default_whisper_backend")]
    pub whisper_backend: String,

    #[serde(default = "default_true")]
    pub align_output: bool,

    #[serde(default = "default_translation_model")]
    pub translation_model: String,

    #[serde(default = "default_subtitle_mode")]
    pub subtitle_mode: SubtitleMode,

    #[serde(default)]
    pub use_existing_subtitles: bool,

    #[serde(default)]
    pub source_language: Option<String>,

    #[serde(default)]
    pub audio_track: Option<usize>,

    #[serde(default)]
    pub subtitle_track: Option<usize>,
}

fn default_whisper_model() -> String {
    "large".to_string()
}

fn default_whisper_backend() -> String {
    "faster-whisper".to_string()
}

fn default_translation_model() -> String {
    "m2m100".to_string()
}

fn default_subtitle_mode() -> SubtitleMode {
    SubtitleMode::Hard
}

fn default_true() -> bool {
    true
}

impl SubmitJobRequest {
    fn into_params(self) -> JobParams {
        JobParams {
            target_languages: self.target_languages,
            whisper_model: self.whisper_model,
            whisper_backend: self.whisper_backend,
            align_output: self.align_output,
            translation_model: self.translation_model,
            subtitle_mode: self.subtitle_mode,
            use_existing_subtitles: self.use_existing_subtitles,
            source_language: self.source_language,
            audio_track: self.audio_track,
            subtitle_track: self.subtitle_track,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/translation/upload
/// Submit a processing job; returns the job id immediately while the
/// pipeline runs in the background.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitJobRequest>,
) -> impl IntoResponse {
    // Validation failures reject the submission; no job is created.
    if req.file_name.is_empty() || req.file_path.as_os_str().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "file_name and file_path are required".to_string(),
            }),
        )
            .into_response();
    }
    if req.target_languages.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "at least one target language is required".to_string(),
            }),
        )
            .into_response();
    }

    info!(
        "Received upload request: file={}, langs={:?}, model={}",
        req.file_name, req.target_languages, req.whisper_model
    );

    let file_name = req.file_name.clone();
    let file_path = req.file_path.clone();
    let job = state
        .registry
        .create(&file_name, &file_path, req.into_params())
        .await;

    Arc::clone(&state.executor).spawn(job.id.clone());

    (StatusCode::OK, Json(SubmitJobResponse { job_id: job.id })).into_response()
}

/// GET /api/translation/status/:job_id
/// Externally visible job status.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.status_view(&job_id).await {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => {
            error!("Job {} not found", job_id);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job {} not found", job_id),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /api/translation/jobs/:job_id
/// Explicit job deletion; also stops any completion watch.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    state.notifier.cancel_watch(&job_id).await;
    state.registry.delete(&job_id).await;
    StatusCode::NO_CONTENT
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
