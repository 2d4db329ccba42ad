//! Clip generation handler.

use std::path::Path;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use mclip_media::subtitle::validate_color;
use mclip_models::{ClipArtifact, ClipFailure, ClipOptions, PipelineOutcome, DEFAULT_SUBTITLE_COLOR};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Request body for `POST /api/clip`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClipRequest {
    /// Path of a video file readable by the server
    #[serde(default)]
    #[validate(length(min = 1, message = "video_path is required"))]
    pub video_path: String,

    #[serde(default = "default_subtitle_color")]
    pub subtitle_color: String,

    /// Emoji prefix for every subtitle
    #[serde(default)]
    pub emojis: Option<String>,

    /// Effect chain, e.g. `speed:1.5,fadein:0.5`
    #[serde(default)]
    pub effects: Option<String>,
}

fn default_subtitle_color() -> String {
    DEFAULT_SUBTITLE_COLOR.to_string()
}

impl ClipRequest {
    fn options(&self) -> ClipOptions {
        ClipOptions {
            subtitle_color: self.subtitle_color.clone(),
            emoji_prefix: self.emojis.clone().filter(|e| !e.is_empty()),
            effects: self.effects.clone().filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Response body for `POST /api/clip`.
#[derive(Debug, Serialize)]
pub struct ClipResponse {
    pub message: String,
    /// Rendered clips; `index` is the moment position
    pub artifacts: Vec<ClipArtifact>,
    /// Full transcript text
    pub transcription: String,
    /// Moments that failed to render
    pub errors: Vec<ClipFailure>,
}

impl From<PipelineOutcome> for ClipResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        let message = if outcome.moment_count == 0 {
            "No key moments found".to_string()
        } else if outcome.is_complete() {
            "Clips generated successfully".to_string()
        } else {
            format!(
                "Generated {} of {} clips",
                outcome.artifacts.len(),
                outcome.moment_count
            )
        };

        Self {
            message,
            artifacts: outcome.artifacts,
            transcription: outcome.transcription_text,
            errors: outcome.errors,
        }
    }
}

/// Transcribe a local video and render its key moments.
pub async fn clip_video(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<ClipRequest>, JsonRejection>,
) -> ApiResult<Json<ClipResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let video_path = request.video_path.trim();
    if video_path.is_empty() {
        return Err(ApiError::bad_request("video_path is required"));
    }

    let is_file = tokio::fs::metadata(video_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ApiError::bad_request(format!("Video not found: {}", video_path)));
    }

    validate_color(&request.subtitle_color).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let options = request.options();
    let run_id = request_id
        .map(|Extension(RequestId(id))| id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(
        run_id = %run_id,
        video_path = %video_path,
        subtitle_color = %options.subtitle_color,
        effects = options.effects.as_deref().unwrap_or(""),
        "Clip request accepted"
    );

    let outcome = state
        .clipper
        .clip_video(Path::new(video_path), &options, &run_id)
        .await?;

    info!(
        moments = outcome.moment_count,
        rendered = outcome.artifacts.len(),
        failed = outcome.errors.len(),
        "Clip request finished"
    );

    Ok(Json(outcome.into()))
}
