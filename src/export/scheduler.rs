//! Wall-clock driven capture loop.
//!
//! A tokio interval ticks at half the frame interval. Each tick derives the
//! frame index from elapsed time and captures only when that index has moved
//! past the last captured one, so frames reach the encoder in strictly
//! increasing order with no duplicates, even when ticks run late.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use super::encoder::FrameEncoder;
use super::pipeline::{EffectChain, FrameCompositor};
use super::plan::ExportPlan;
use crate::error::{CaptureError, ExportError};
use crate::rendering::RenderSurface;

/// Shared cancellation flag for one export.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Snapshot published after every captured frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    pub frames: u64,
    pub target_frames: u64,
    /// Non-decreasing, in [0, 1]
    pub fraction: f32,
    pub done: bool,
}

/// How a run ended when nothing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed { frames: u64 },
    Cancelled { frames: u64 },
}

impl ExportOutcome {
    pub fn frames(&self) -> u64 {
        match self {
            ExportOutcome::Completed { frames } | ExportOutcome::Cancelled { frames } => *frames,
        }
    }
}

pub struct ExportScheduler {
    plan: ExportPlan,
    width: u32,
    height: u32,
    scratch_scale: f32,
    chain: EffectChain,
    abort: AbortHandle,
    progress: watch::Sender<ExportProgress>,
}

impl ExportScheduler {
    pub fn new(
        plan: ExportPlan,
        width: u32,
        height: u32,
        scratch_scale: f32,
        chain: EffectChain,
    ) -> Self {
        let (progress, _) = watch::channel(ExportProgress {
            frames: 0,
            target_frames: plan.target_frame_count,
            fraction: 0.0,
            done: false,
        });
        Self {
            plan,
            width,
            height,
            scratch_scale,
            chain,
            abort: AbortHandle::default(),
            progress,
        }
    }

    pub fn plan(&self) -> &ExportPlan {
        &self.plan
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportProgress> {
        self.progress.subscribe()
    }

    /// Capture, compose and encode frames until the loop is complete or the
    /// abort flag is raised.
    ///
    /// The ticker stays on the async runtime; capture, compositing and
    /// encoding for each frame run on the blocking pool. The encoder is
    /// finished on both completion and cancellation. Surface allocation,
    /// compositing and encoder errors end the run.
    pub async fn run<S, E>(self, source: S, encoder: E) -> Result<ExportOutcome, ExportError>
    where
        S: RenderSurface + 'static,
        E: FrameEncoder + 'static,
    {
        let Self {
            plan,
            width,
            height,
            scratch_scale,
            chain,
            abort,
            progress,
        } = self;

        let compositor =
            FrameCompositor::new(source.dimensions(), width, height, scratch_scale, chain)?;

        tracing::info!(
            frames = plan.target_frame_count,
            fps = plan.fps,
            width,
            height,
            crop = ?compositor.crop(),
            mode = ?compositor.chain().mode(),
            "Export started"
        );

        let mut worker = FrameWorker {
            source,
            encoder,
            compositor,
        };

        let tick = Duration::from_nanos((plan.frame_interval_ms * 500_000.0).ceil() as u64);
        let mut ticker = tokio::time::interval(tick.max(Duration::from_micros(100)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let started = Instant::now();
        let mut last_index: Option<u64> = None;
        let mut frames = 0u64;

        loop {
            ticker.tick().await;

            if abort.is_aborted() {
                let (_, finished) = off_runtime(worker, |w| w.encoder.finish()).await?;
                finished?;
                publish(&progress, &plan, frames, Stage::Cancelled);
                tracing::info!(frames, "Export cancelled");
                return Ok(ExportOutcome::Cancelled { frames });
            }

            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            if elapsed_ms >= plan.stop_duration_ms {
                break;
            }

            let index = plan.frame_index_at(elapsed_ms);
            if index >= plan.target_frame_count {
                break;
            }
            if last_index.is_some_and(|last| index <= last) {
                continue;
            }

            let expected = last_index.map_or(0, |last| last + 1);
            if index > expected {
                tracing::debug!(from = expected, to = index - 1, "Frames dropped, capture fell behind");
            }

            let t = plan.frame_time(index);
            let (returned, step) = off_runtime(worker, move |w| w.render(t)).await?;
            worker = returned;
            if let FrameStep::CaptureFailed(e) = step? {
                tracing::warn!(%e, index, "Capture failed, retrying on next tick");
                continue;
            }

            last_index = Some(index);
            frames += 1;
            publish(&progress, &plan, frames, Stage::Running);
            tracing::trace!(index, frames, "Frame captured");
        }

        let (_, finished) = off_runtime(worker, |w| w.encoder.finish()).await?;
        finished?;
        publish(&progress, &plan, frames, Stage::Completed);
        tracing::info!(
            frames,
            target = plan.target_frame_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Export completed"
        );
        Ok(ExportOutcome::Completed { frames })
    }
}

/// Everything one frame needs, owned so it can move to the blocking pool.
struct FrameWorker<S, E> {
    source: S,
    encoder: E,
    compositor: FrameCompositor,
}

enum FrameStep {
    Encoded,
    CaptureFailed(CaptureError),
}

impl<S: RenderSurface, E: FrameEncoder> FrameWorker<S, E> {
    fn render(&mut self, t: f64) -> Result<FrameStep, ExportError> {
        let pixmap = match self.source.capture(t) {
            Ok(pixmap) => pixmap,
            Err(e) => return Ok(FrameStep::CaptureFailed(e)),
        };
        let frame = self.compositor.compose(&pixmap)?;
        self.encoder.encode_frame(&frame)?;
        Ok(FrameStep::Encoded)
    }
}

/// Run `job` on the blocking pool and hand `worker` back with its result.
async fn off_runtime<W, T, F>(mut worker: W, job: F) -> Result<(W, T), ExportError>
where
    W: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut W) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let out = job(&mut worker);
        (worker, out)
    })
    .await
    .map_err(|e| ExportError::Worker(e.to_string()))
}

#[derive(Clone, Copy, PartialEq)]
enum Stage {
    Running,
    Cancelled,
    Completed,
}

fn publish(progress: &watch::Sender<ExportProgress>, plan: &ExportPlan, frames: u64, stage: Stage) {
    progress.send_modify(|p| {
        p.frames = frames;
        // a completed run reports 1.0 even if late ticks dropped frames
        let fraction = if stage == Stage::Completed {
            1.0
        } else {
            plan.progress(frames)
        };
        p.fraction = p.fraction.max(fraction);
        p.done = stage != Stage::Running;
    });
}
