//! The encoder contract and the PNG-sequence implementation.

use retro_dither::Framebuffer;
use std::path::{Path, PathBuf};

use crate::error::EncodeError;
use crate::rendering::write_png;

/// Consumes finished frames in index order.
pub trait FrameEncoder: Send {
    fn encode_frame(&mut self, frame: &Framebuffer) -> Result<(), EncodeError>;

    /// Flush and close the output. Called once, on completion or abort.
    fn finish(&mut self) -> Result<(), EncodeError>;
}

impl<E: FrameEncoder + ?Sized> FrameEncoder for Box<E> {
    fn encode_frame(&mut self, frame: &Framebuffer) -> Result<(), EncodeError> {
        (**self).encode_frame(frame)
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        (**self).finish()
    }
}

/// Check a frame against the encoder's fixed size.
pub(crate) fn check_frame_size(
    frame: &Framebuffer,
    width: u32,
    height: u32,
) -> Result<(), EncodeError> {
    if frame.width() != width as usize || frame.height() != height as usize {
        return Err(EncodeError::FrameSize {
            got_width: frame.width(),
            got_height: frame.height(),
            width: width as usize,
            height: height as usize,
        });
    }
    Ok(())
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceEncoder {
    dir: PathBuf,
    width: u32,
    height: u32,
    written: u64,
    finished: bool,
}

impl PngSequenceEncoder {
    pub fn new(dir: impl Into<PathBuf>, width: u32, height: u32) -> Result<Self, EncodeError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            width,
            height,
            written: 0,
            finished: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl FrameEncoder for PngSequenceEncoder {
    fn encode_frame(&mut self, frame: &Framebuffer) -> Result<(), EncodeError> {
        if self.finished {
            return Err(EncodeError::Finished);
        }
        check_frame_size(frame, self.width, self.height)?;
        write_png(&self.frame_path(self.written), frame)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        if !self.finished {
            self.finished = true;
            tracing::debug!(dir = %self.dir.display(), frames = self.written, "PNG sequence closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seq");
        let mut encoder = PngSequenceEncoder::new(&out, 4, 2).unwrap();

        let frame = Framebuffer::filled(4, 2, [255, 0, 0, 255]).unwrap();
        encoder.encode_frame(&frame).unwrap();
        encoder.encode_frame(&frame).unwrap();
        encoder.finish().unwrap();

        assert_eq!(encoder.frames_written(), 2);
        assert!(out.join("frame_00000.png").is_file());
        assert!(out.join("frame_00001.png").is_file());
        assert!(!out.join("frame_00002.png").exists());
    }

    #[test]
    fn test_rejects_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = PngSequenceEncoder::new(dir.path(), 4, 2).unwrap();
        let frame = Framebuffer::new(2, 2).unwrap();
        assert!(matches!(
            encoder.encode_frame(&frame),
            Err(EncodeError::FrameSize { got_width: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_frames_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = PngSequenceEncoder::new(dir.path(), 1, 1).unwrap();
        encoder.finish().unwrap();
        let frame = Framebuffer::new(1, 1).unwrap();
        assert!(matches!(
            encoder.encode_frame(&frame),
            Err(EncodeError::Finished)
        ));
    }
}
