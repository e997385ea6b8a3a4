use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::export::render_still;
use crate::models::{EffectMode, EffectOverrides};
use crate::rendering::{encode_png, LoopScene};
use crate::server::AppState;

/// Query parameters for the preview endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Scene time in seconds (default 0)
    pub t: Option<f64>,
    /// Effect mode override
    pub mode: Option<EffectMode>,
    /// Named palette override
    pub palette: Option<String>,
    /// Dither algorithm override
    pub algorithm: Option<String>,
    pub intensity: Option<f32>,
    pub resolution: Option<f32>,
    pub pixel_size: Option<u32>,
}

impl PreviewQuery {
    fn overrides(&self) -> EffectOverrides {
        EffectOverrides {
            mode: self.mode,
            palette: self.palette.clone(),
            colors: None,
            algorithm: self.algorithm.clone(),
            intensity: self.intensity,
            resolution: self.resolution,
            pixel_size: self.pixel_size,
        }
    }
}

/// Render one processed frame
///
/// Captures the loop scene at time `t` and runs it through the configured
/// effect stack at export resolution.
#[utoipa::path(
    get,
    path = "/api/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "PNG frame", content_type = "image/png"),
        (status = 400, description = "Invalid effect settings"),
    ),
    tag = "Preview"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, ApiError> {
    let t = query.t.unwrap_or(0.0);
    if !t.is_finite() {
        return Err(ApiError::BadRequest("t must be a finite number".into()));
    }

    let mut effects = state.config.effects.clone();
    query.overrides().apply(&mut effects);
    let export = state.config.export.clone();
    let mut scene = LoopScene::from_config(&state.config.scene, export.loop_duration);

    let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let frame = render_still(
            &mut scene,
            &effects,
            export.width,
            export.height,
            export.scratch_scale,
            t,
        )?;
        encode_png(&frame).map_err(|e| ApiError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("preview task failed: {e}")))??;

    tracing::debug!(t, bytes = png.len(), "Preview rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}
