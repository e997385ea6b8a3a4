//! Scheduler tests on a paused tokio clock.
//!
//! With `start_paused` the runtime jumps straight to the next timer
//! deadline whenever it is idle, so every run is deterministic and takes no
//! real time.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::thread;

use retro_dither::NamedPalette;
use retroloop::error::ExportError;
use retroloop::export::{EffectChain, ExportOutcome, ExportPlan, ExportScheduler};
use retroloop::models::{EffectMode, EffectSettings};

fn scheduler(loop_secs: f64, fps: u32) -> ExportScheduler {
    let plan = ExportPlan::new(loop_secs, 1, fps).unwrap();
    ExportScheduler::new(plan, 8, 8, 0.5, EffectChain::Passthrough)
}

fn assert_frame_times(times: &[f64], fps: u32) {
    for (i, t) in times.iter().enumerate() {
        let expected = i as f64 / fps as f64;
        assert!(
            (t - expected).abs() < 1e-9,
            "capture {} at t={}, expected {}",
            i,
            t,
            expected
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_second_loop_exports_sixty_frames_in_order() {
    let surface = ScriptedSurface::new(16, 16);
    let times = surface.times.clone();
    let encoder = RecordingEncoder::default();

    let outcome = scheduler(2.0, 30)
        .run(surface, encoder.clone())
        .await
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Completed { frames: 60 });
    assert_eq!(encoder.frame_count(), 60);
    assert_eq!(encoder.finish_calls(), 1);

    let times = times.lock().unwrap();
    assert_eq!(times.len(), 60);
    assert_frame_times(&times, 30);
}

#[tokio::test(start_paused = true)]
async fn test_frames_arrive_in_capture_order() {
    let surface = ScriptedSurface::new(8, 8);
    let encoder = RecordingEncoder::default();

    scheduler(1.0, 24)
        .run(surface, encoder.clone())
        .await
        .unwrap();

    assert_eq!(encoder.frame_count(), 24);
    // the surface stamps its capture count into the red channel
    for (i, frame) in encoder.frames().iter().enumerate() {
        assert_eq!(frame.pixel(0, 0)[0], i as u8);
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_capture_failure_is_retried() {
    let mut surface = ScriptedSurface::new(16, 16);
    surface.fail_on.insert(5);
    surface.fail_on.insert(6);
    let times = surface.times.clone();
    let encoder = RecordingEncoder::default();

    let outcome = scheduler(2.0, 30)
        .run(surface, encoder.clone())
        .await
        .unwrap();

    // attempt 5 fails, the next tick for the same index fails too, and the
    // index is recovered on the following tick or skipped, never duplicated
    let times = times.lock().unwrap();
    assert_eq!(outcome.frames() as usize, times.len());
    assert!(times.len() >= 59);
    for pair in times.windows(2) {
        assert!(pair[1] > pair[0], "capture times must strictly increase");
    }
    assert_eq!(encoder.finish_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_single_failure_loses_no_frames() {
    let mut surface = ScriptedSurface::new(16, 16);
    surface.fail_on.insert(5);
    let times = surface.times.clone();
    let encoder = RecordingEncoder::default();

    let outcome = scheduler(2.0, 30)
        .run(surface, encoder.clone())
        .await
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Completed { frames: 60 });
    assert_frame_times(&times.lock().unwrap(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_abort_finishes_encoder_and_reports_cancelled() {
    let scheduler = scheduler(2.0, 30);
    let mut surface = ScriptedSurface::new(16, 16);
    surface.abort_after = Some((10, scheduler.abort_handle()));
    let encoder = RecordingEncoder::default();

    let outcome = scheduler.run(surface, encoder.clone()).await.unwrap();

    assert_eq!(outcome, ExportOutcome::Cancelled { frames: 10 });
    assert_eq!(encoder.frame_count(), 10);
    assert_eq!(encoder.finish_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abort_before_start_captures_nothing() {
    let scheduler = scheduler(2.0, 30);
    scheduler.abort_handle().abort();
    let surface = ScriptedSurface::new(16, 16);
    let times = surface.times.clone();
    let encoder = RecordingEncoder::default();

    let outcome = scheduler.run(surface, encoder.clone()).await.unwrap();

    assert_eq!(outcome, ExportOutcome::Cancelled { frames: 0 });
    assert!(times.lock().unwrap().is_empty());
    assert_eq!(encoder.finish_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_encoder_failure_ends_the_run() {
    let surface = ScriptedSurface::new(16, 16);
    let encoder = RecordingEncoder::failing_at(3);

    let result = scheduler(2.0, 30).run(surface, encoder.clone()).await;

    assert!(matches!(result, Err(ExportError::Encode(_))));
    assert_eq!(encoder.frame_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unusable_surface_is_a_setup_failure() {
    let surface = ScriptedSurface::new(0, 16);
    let times = surface.times.clone();
    let encoder = RecordingEncoder::default();

    let result = scheduler(2.0, 30).run(surface, encoder.clone()).await;

    assert!(matches!(
        result,
        Err(ExportError::SurfaceAllocation { .. })
    ));
    assert!(times.lock().unwrap().is_empty());
    assert_eq!(encoder.frame_count(), 0);
    assert_eq!(encoder.finish_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_monotonic_and_completes() {
    let scheduler = scheduler(1.0, 10);
    let mut progress = scheduler.subscribe();
    let surface = ScriptedSurface::new(16, 16);
    let encoder = RecordingEncoder::default();

    let collector = async {
        let mut seen = Vec::new();
        while progress.changed().await.is_ok() {
            let p = *progress.borrow_and_update();
            seen.push(p);
            if p.done {
                break;
            }
        }
        seen
    };

    let (outcome, seen) = tokio::join!(scheduler.run(surface, encoder.clone()), collector);

    assert_eq!(outcome.unwrap(), ExportOutcome::Completed { frames: 10 });
    assert!(!seen.is_empty());
    for pair in seen.windows(2) {
        assert!(pair[1].fraction >= pair[0].fraction);
        assert!(pair[1].frames >= pair[0].frames);
    }
    let last = seen.last().unwrap();
    assert!(last.done);
    assert_eq!(last.fraction, 1.0);
    assert_eq!(last.frames, 10);
    assert_eq!(last.target_frames, 10);
}

#[tokio::test(start_paused = true)]
async fn test_dither_chain_writes_palette_frames() {
    let effects = EffectSettings {
        mode: EffectMode::Dither,
        palette: "zx-spectrum".into(),
        algorithm: "stucki".into(),
        ..Default::default()
    };
    let chain = EffectChain::from_settings(&effects).unwrap();
    let plan = ExportPlan::new(0.5, 1, 10).unwrap();
    let scheduler = ExportScheduler::new(plan, 16, 12, 0.5, chain);

    let surface = ScriptedSurface::new(40, 30);
    let encoder = RecordingEncoder::default();
    let outcome = scheduler.run(surface, encoder.clone()).await.unwrap();

    assert_eq!(outcome.frames(), 5);
    let palette = NamedPalette::ZxSpectrum.palette();
    for frame in &encoder.frames() {
        assert_eq!((frame.width(), frame.height()), (16, 12));
        assert_palette_only(frame, &palette);
    }
}

#[tokio::test(start_paused = true)]
async fn test_frames_are_produced_off_the_runtime_thread() {
    let surface = ScriptedSurface::new(16, 16);
    let threads = surface.threads.clone();
    let encoder = RecordingEncoder::default();
    let runtime_thread = thread::current().id();

    let outcome = scheduler(0.5, 10)
        .run(surface, encoder.clone())
        .await
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Completed { frames: 5 });
    let threads = threads.lock().unwrap();
    assert_eq!(threads.len(), 5);
    assert!(threads.iter().all(|id| *id != runtime_thread));
    assert_eq!(encoder.finish_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_boxed_encoder_runs_on_multi_thread_runtime() {
    let surface = ScriptedSurface::new(16, 16);
    let encoder = RecordingEncoder::default();
    let boxed: Box<dyn retroloop::export::FrameEncoder> = Box::new(encoder.clone());

    let outcome = scheduler(0.2, 10).run(surface, boxed).await.unwrap();

    assert_eq!(outcome.frames() as usize, encoder.frame_count());
    assert!(encoder.frame_count() >= 1);
    assert_eq!(encoder.finish_calls(), 1);
}
