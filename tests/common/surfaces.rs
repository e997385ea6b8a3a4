//! Scripted render surfaces and recording encoders for scheduler tests.

use retro_dither::Framebuffer;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use tiny_skia::{Color, Pixmap};

use retroloop::error::{CaptureError, EncodeError};
use retroloop::export::{AbortHandle, FrameEncoder};
use retroloop::rendering::RenderSurface;

/// Flat-color surface that records every capture time.
///
/// The red channel encodes the capture count so encoded frames can be
/// matched back to captures.
pub struct ScriptedSurface {
    width: u32,
    height: u32,
    pub times: Arc<Mutex<Vec<f64>>>,
    /// Thread each successful capture ran on
    pub threads: Arc<Mutex<Vec<ThreadId>>>,
    /// Capture attempts (1-based) that fail once
    pub fail_on: HashSet<usize>,
    /// Raise this abort flag after this many successful captures
    pub abort_after: Option<(usize, AbortHandle)>,
    attempts: usize,
    captured: usize,
}

impl ScriptedSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            times: Arc::new(Mutex::new(Vec::new())),
            threads: Arc::new(Mutex::new(Vec::new())),
            fail_on: HashSet::new(),
            abort_after: None,
            attempts: 0,
            captured: 0,
        }
    }
}

impl RenderSurface for ScriptedSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&mut self, t: f64) -> Result<Pixmap, CaptureError> {
        self.attempts += 1;
        if self.fail_on.contains(&self.attempts) {
            return Err(CaptureError::Unavailable(format!(
                "scripted failure #{}",
                self.attempts
            )));
        }

        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(CaptureError::Surface {
            width: self.width,
            height: self.height,
        })?;
        let v = (self.captured % 256) as u8;
        pixmap.fill(Color::from_rgba8(v, 128, 64, 255));

        self.times.lock().unwrap().push(t);
        self.threads.lock().unwrap().push(thread::current().id());
        self.captured += 1;
        if let Some((after, abort)) = &self.abort_after {
            if self.captured >= *after {
                abort.abort();
            }
        }
        Ok(pixmap)
    }
}

#[derive(Default)]
struct Recording {
    frames: Vec<Framebuffer>,
    finish_calls: usize,
}

/// Encoder that keeps every frame in memory.
///
/// Clones share one recording, so a test keeps a clone to inspect after the
/// scheduler has taken the encoder.
#[derive(Clone, Default)]
pub struct RecordingEncoder {
    recording: Arc<Mutex<Recording>>,
    /// Fail on this (0-based) frame
    fail_at: Option<usize>,
}

impl RecordingEncoder {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub fn frames(&self) -> Vec<Framebuffer> {
        self.recording.lock().unwrap().frames.clone()
    }

    pub fn frame_count(&self) -> usize {
        self.recording.lock().unwrap().frames.len()
    }

    pub fn finish_calls(&self) -> usize {
        self.recording.lock().unwrap().finish_calls
    }
}

impl FrameEncoder for RecordingEncoder {
    fn encode_frame(&mut self, frame: &Framebuffer) -> Result<(), EncodeError> {
        let mut recording = self.recording.lock().unwrap();
        if recording.finish_calls > 0 {
            return Err(EncodeError::Finished);
        }
        if self.fail_at == Some(recording.frames.len()) {
            return Err(EncodeError::Ffmpeg("broken pipe".into()));
        }
        recording.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        self.recording.lock().unwrap().finish_calls += 1;
        Ok(())
    }
}
