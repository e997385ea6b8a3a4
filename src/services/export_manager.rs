use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use utoipa::ToSchema;

use crate::error::{ApiError, ExportError};
use crate::export::{
    AbortHandle, EffectChain, ExportOutcome, ExportPlan, ExportProgress, ExportScheduler,
    FfmpegConfig, FfmpegEncoder, FrameEncoder, PngSequenceEncoder,
};
use crate::models::{EffectSettings, ExportFormat, ExportSettings};
use crate::rendering::LoopScene;

/// Lifecycle of the current (or last) export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Export job status as reported by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobStatus {
    pub state: JobState,
    /// Fraction of frames captured, 0-1
    pub progress: f32,
    pub frames: u64,
    pub target_frames: u64,
    pub format: Option<ExportFormat>,
    pub output: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobStatus {
    fn idle() -> Self {
        Self {
            state: JobState::Idle,
            progress: 0.0,
            frames: 0,
            target_frames: 0,
            format: None,
            output: None,
            started_at: None,
            finished_at: None,
            error: None,
        }
    }
}

struct Job {
    status: JobStatus,
    abort: Option<AbortHandle>,
    progress: Option<watch::Receiver<ExportProgress>>,
}

/// Runs at most one export at a time in the background
pub struct ExportManager {
    job: Arc<RwLock<Job>>,
}

impl ExportManager {
    pub fn new() -> Self {
        Self {
            job: Arc::new(RwLock::new(Job {
                status: JobStatus::idle(),
                abort: None,
                progress: None,
            })),
        }
    }

    /// Start an export of `scene` in a background task.
    ///
    /// The effect chain is built fresh here, so every job starts with an
    /// empty quantizer cache.
    pub async fn start(
        &self,
        scene: LoopScene,
        effects: &EffectSettings,
        settings: &ExportSettings,
        output: PathBuf,
    ) -> Result<JobStatus, ApiError> {
        let mut job = self.job.write().await;
        if job.status.state == JobState::Running {
            return Err(ApiError::ExportRunning);
        }

        settings.validate()?;
        let plan = ExportPlan::new(settings.loop_duration, settings.loop_count, settings.fps)?;
        let chain = EffectChain::from_settings(effects)?;
        let encoder = create_encoder(settings, &output)?;

        let scheduler = ExportScheduler::new(
            plan,
            settings.width,
            settings.height,
            settings.scratch_scale,
            chain,
        );
        job.abort = Some(scheduler.abort_handle());
        job.progress = Some(scheduler.subscribe());
        job.status = JobStatus {
            state: JobState::Running,
            target_frames: plan.target_frame_count,
            format: Some(settings.format),
            output: Some(output.display().to_string()),
            started_at: Some(Utc::now()),
            ..JobStatus::idle()
        };
        let status = job.status.clone();
        drop(job);

        let shared = self.job.clone();
        let partial = output.clone();
        tokio::spawn(async move {
            let result = scheduler.run(scene, encoder).await;

            let mut job = shared.write().await;
            let last = job.progress.as_ref().map(|rx| *rx.borrow());
            job.status.finished_at = Some(Utc::now());
            job.abort = None;
            job.progress = None;
            if let Some(p) = last {
                job.status.progress = p.fraction;
            }

            match result {
                Ok(ExportOutcome::Completed { frames }) => {
                    job.status.state = JobState::Completed;
                    job.status.frames = frames;
                    job.status.progress = 1.0;
                }
                Ok(ExportOutcome::Cancelled { frames }) => {
                    job.status.state = JobState::Cancelled;
                    job.status.frames = frames;
                    discard_partial_output(&partial);
                }
                Err(e) => {
                    tracing::error!(%e, "Export failed");
                    job.status.state = JobState::Failed;
                    job.status.error = Some(e.to_string());
                }
            }
        });

        tracing::info!(
            output = %output.display(),
            format = ?settings.format,
            frames = plan.target_frame_count,
            "Export job queued"
        );
        Ok(status)
    }

    /// Current job status, with live progress while running.
    pub async fn status(&self) -> JobStatus {
        let job = self.job.read().await;
        let mut status = job.status.clone();
        if status.state == JobState::Running {
            if let Some(rx) = &job.progress {
                let p = *rx.borrow();
                status.frames = p.frames;
                status.progress = p.fraction;
            }
        }
        status
    }

    /// Raise the abort flag of the running job.
    pub async fn cancel(&self) -> Result<JobStatus, ApiError> {
        let job = self.job.read().await;
        match (&job.abort, job.status.state) {
            (Some(abort), JobState::Running) => {
                abort.abort();
                tracing::info!("Export cancellation requested");
                Ok(job.status.clone())
            }
            _ => Err(ApiError::NoActiveExport),
        }
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove whatever a cancelled export left behind.
pub fn discard_partial_output(path: &std::path::Path) {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else if path.exists() {
        std::fs::remove_file(path)
    } else {
        return;
    };
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "Discarded partial export"),
        Err(e) => tracing::warn!(%e, path = %path.display(), "Failed to discard partial export"),
    }
}

/// Pick the encoder for an export format.
pub fn create_encoder(
    settings: &ExportSettings,
    output: &std::path::Path,
) -> Result<Box<dyn FrameEncoder>, ExportError> {
    let encoder: Box<dyn FrameEncoder> = match settings.format {
        ExportFormat::Png => Box::new(PngSequenceEncoder::new(
            output,
            settings.width,
            settings.height,
        )?),
        format => Box::new(FfmpegEncoder::new(FfmpegConfig {
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
            format,
            quality: settings.quality,
            out_path: output.to_path_buf(),
        })?),
    };
    Ok(encoder)
}
