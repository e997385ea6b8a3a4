//! Timed export: plan, crop, compositing, scheduling and encoders.

pub mod crop;
pub mod encoder;
pub mod ffmpeg;
pub mod pipeline;
pub mod plan;
pub mod scheduler;
pub mod still;

pub use crop::CropRect;
pub use encoder::{FrameEncoder, PngSequenceEncoder};
pub use ffmpeg::{FfmpegConfig, FfmpegEncoder};
pub use pipeline::{EffectChain, FrameCompositor};
pub use plan::{bitrate, ExportPlan};
pub use scheduler::{AbortHandle, ExportOutcome, ExportProgress, ExportScheduler};
pub use still::render_still;
