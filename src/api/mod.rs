pub mod export;
pub mod preview;

pub use export::{
    handle_cancel_export, handle_export_status, handle_start_export, ExportRequest,
    __path_handle_cancel_export, __path_handle_export_status, __path_handle_start_export,
};
pub use preview::{handle_preview, PreviewQuery, __path_handle_preview};

use utoipa::OpenApi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retroloop API",
        description = "Live preview and timed export of retro-filtered generative loops",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        preview::handle_preview,
        export::handle_start_export,
        export::handle_export_status,
        export::handle_cancel_export,
    ),
    components(schemas(
        ExportRequest,
        crate::services::JobStatus,
        crate::services::JobState,
        crate::models::EffectOverrides,
        crate::models::EffectMode,
        crate::models::ExportFormat,
        crate::models::Quality,
    )),
    tags(
        (name = "Preview", description = "Single processed frames"),
        (name = "Export", description = "Background export jobs")
    )
)]
pub struct ApiDoc;
