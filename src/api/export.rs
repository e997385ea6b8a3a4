use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{EffectOverrides, ExportFormat, ExportSettings, Quality};
use crate::rendering::LoopScene;
use crate::server::AppState;
use crate::services::JobStatus;

/// Export request; every field falls back to the configured value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub effects: EffectOverrides,
    pub loop_duration: Option<f64>,
    pub loop_count: Option<u32>,
    pub fps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<ExportFormat>,
    pub quality: Option<Quality>,
    pub scratch_scale: Option<f32>,
    /// Output file, or directory for PNG sequences
    pub output: Option<String>,
}

impl ExportRequest {
    pub fn apply(&self, settings: &mut ExportSettings) {
        if let Some(v) = self.loop_duration {
            settings.loop_duration = v;
        }
        if let Some(v) = self.loop_count {
            settings.loop_count = v;
        }
        if let Some(v) = self.fps {
            settings.fps = v;
        }
        if let Some(v) = self.width {
            settings.width = v;
        }
        if let Some(v) = self.height {
            settings.height = v;
        }
        if let Some(v) = self.format {
            settings.format = v;
        }
        if let Some(v) = self.quality {
            settings.quality = v;
        }
        if let Some(v) = self.scratch_scale {
            settings.scratch_scale = v;
        }
        if let Some(v) = &self.output {
            settings.output = PathBuf::from(v);
        }
    }
}

/// Start an export
///
/// Runs in the background; poll `GET /api/export` for progress.
#[utoipa::path(
    post,
    path = "/api/export",
    request_body = ExportRequest,
    responses(
        (status = 202, description = "Export started", body = JobStatus),
        (status = 400, description = "Invalid settings"),
        (status = 409, description = "An export is already running"),
    ),
    tag = "Export"
)]
pub async fn handle_start_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut effects = state.config.effects.clone();
    request.effects.apply(&mut effects);
    let mut settings = state.config.export.clone();
    request.apply(&mut settings);

    let scene = LoopScene::from_config(&state.config.scene, settings.loop_duration);
    let output = settings.resolved_output();
    let status = state
        .export_manager
        .start(scene, &effects, &settings, output)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// Current export status
#[utoipa::path(
    get,
    path = "/api/export",
    responses(
        (status = 200, description = "Status of the current or last export", body = JobStatus),
    ),
    tag = "Export"
)]
pub async fn handle_export_status(State(state): State<AppState>) -> Json<JobStatus> {
    Json(state.export_manager.status().await)
}

/// Cancel the running export
#[utoipa::path(
    delete,
    path = "/api/export",
    responses(
        (status = 202, description = "Cancellation requested", body = JobStatus),
        (status = 404, description = "No export is running"),
    ),
    tag = "Export"
)]
pub async fn handle_cancel_export(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.export_manager.cancel().await?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}
