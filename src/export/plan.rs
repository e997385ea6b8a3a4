//! Frame timing and bitrate for an export run.

use crate::error::ExportError;
use crate::models::Quality;

/// Lower bound of the video bitrate, in bits per second.
pub const MIN_BITRATE: u64 = 500_000;
/// Upper bound of the video bitrate, in bits per second.
pub const MAX_BITRATE: u64 = 80_000_000;

/// Quantities derived from loop length, loop count and frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlan {
    pub fps: u32,
    pub target_frame_count: u64,
    pub frame_interval_ms: f64,
    pub exact_duration_ms: f64,
    /// Wall-clock budget after which capture stops. Slightly shorter than
    /// the exact duration so the frame after the last one never starts.
    pub stop_duration_ms: f64,
}

impl ExportPlan {
    pub fn new(loop_duration_secs: f64, loop_count: u32, fps: u32) -> Result<Self, ExportError> {
        if fps == 0 {
            return Err(ExportError::InvalidSettings("fps must be non-zero".into()));
        }
        if !(loop_duration_secs.is_finite() && loop_duration_secs > 0.0) || loop_count == 0 {
            return Err(ExportError::InvalidSettings(format!(
                "loop of {loop_duration_secs}s x {loop_count} is empty"
            )));
        }

        let target = (loop_duration_secs * f64::from(loop_count) * f64::from(fps)).round();
        if target < 1.0 {
            return Err(ExportError::InvalidSettings(format!(
                "{loop_duration_secs}s at {fps} fps yields no frames"
            )));
        }

        let frame_interval_ms = 1000.0 / f64::from(fps);
        let exact_duration_ms = target / f64::from(fps) * 1000.0;

        Ok(Self {
            fps,
            target_frame_count: target as u64,
            frame_interval_ms,
            exact_duration_ms,
            stop_duration_ms: exact_duration_ms - 0.1 * frame_interval_ms,
        })
    }

    /// Frame index implied by `elapsed_ms` of wall-clock time.
    ///
    /// The small epsilon keeps exact multiples of the interval from landing
    /// one index short through float error.
    pub fn frame_index_at(&self, elapsed_ms: f64) -> u64 {
        (elapsed_ms / self.frame_interval_ms + 1e-6).floor().max(0.0) as u64
    }

    /// Scene time of frame `index`, in seconds.
    pub fn frame_time(&self, index: u64) -> f64 {
        index as f64 / f64::from(self.fps)
    }

    /// Fraction of frames captured so far, in [0, 1].
    pub fn progress(&self, frames: u64) -> f32 {
        (frames as f64 / self.target_frame_count as f64).clamp(0.0, 1.0) as f32
    }
}

/// Video bitrate for a frame size, rate and quality preset.
pub fn bitrate(width: u32, height: u32, fps: u32, quality: Quality) -> u64 {
    let raw = f64::from(width) * f64::from(height) * f64::from(fps) * quality.multiplier();
    (raw.round() as u64).clamp(MIN_BITRATE, MAX_BITRATE)
}
