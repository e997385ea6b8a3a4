use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("An export is already running")]
    ExportRunning,

    #[error("No export is running")]
    NoActiveExport,

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures that end an export job, or prevent one from starting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to allocate {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Frame error: {0}")]
    Frame(#[from] retro_dither::FramebufferError),

    #[error("Effect configuration error: {0}")]
    Effects(#[from] retro_dither::DitherError),

    #[error("Encoder error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Frame worker failed: {0}")]
    Worker(String),
}

/// A single capture attempt failed; the scheduler skips the tick.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to allocate {width}x{height} capture surface")]
    Surface { width: u32, height: u32 },

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encode error: {0}")]
    Png(String),

    #[error("Frame size mismatch: got {got_width}x{got_height}, expected {width}x{height}")]
    FrameSize {
        got_width: usize,
        got_height: usize,
        width: usize,
        height: usize,
    },

    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Encoder already finished")]
    Finished,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::ExportRunning => (StatusCode::CONFLICT, self.to_string()),
            ApiError::NoActiveExport => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Export(ExportError::InvalidSettings(_))
            | ApiError::Export(ExportError::Effects(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Export(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
