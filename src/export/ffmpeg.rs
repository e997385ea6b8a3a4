//! Video and GIF output through the system `ffmpeg` binary.
//!
//! Frames are flattened over black and piped as raw RGBA on stdin.

use retro_dither::Framebuffer;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use super::encoder::{check_frame_size, FrameEncoder};
use super::plan::bitrate;
use crate::error::EncodeError;
use crate::models::{ExportFormat, Quality};

/// Bytes of ffmpeg stderr kept for error reports.
const STDERR_TAIL: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub format: ExportFormat,
    pub quality: Quality,
    pub out_path: PathBuf,
}

impl FfmpegConfig {
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.width == 0 || self.height == 0 || self.fps == 0 {
            return Err(EncodeError::Ffmpeg(
                "width, height and fps must be non-zero".into(),
            ));
        }
        if self.format == ExportFormat::Png {
            return Err(EncodeError::Ffmpeg(
                "png sequences are written without ffmpeg".into(),
            ));
        }
        if self.format == ExportFormat::Mp4 && (self.width % 2 != 0 || self.height % 2 != 0) {
            return Err(EncodeError::Ffmpeg(
                "width/height must be even (required for yuv420p mp4 output)".into(),
            ));
        }
        Ok(())
    }

    /// Arguments after the raw input description.
    pub fn output_args(&self) -> Vec<String> {
        let rate = bitrate(self.width, self.height, self.fps, self.quality).to_string();
        let mut args: Vec<String> = vec!["-an".into()];
        match self.format {
            ExportFormat::Mp4 => args.extend(
                [
                    "-c:v", "libx264", "-pix_fmt", "yuv420p", "-b:v", rate.as_str(), "-movflags",
                    "+faststart", "-f", "mp4",
                ]
                .map(String::from),
            ),
            ExportFormat::Webm => args.extend(
                [
                    "-c:v", "libvpx-vp9", "-pix_fmt", "yuv420p", "-b:v", rate.as_str(), "-f",
                    "webm",
                ]
                .map(String::from),
            ),
            // frames are already palette-reduced, so paletteuse must not dither again
            ExportFormat::Gif => args.extend(
                [
                    "-filter_complex",
                    "split[a][b];[a]palettegen=stats_mode=full[p];[b][p]paletteuse=dither=none",
                    "-loop",
                    "0",
                    "-f",
                    "gif",
                ]
                .map(String::from),
            ),
            ExportFormat::Png => {}
        }
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> Result<(), EncodeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub struct FfmpegEncoder {
    cfg: FfmpegConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<String>>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: FfmpegConfig) -> Result<Self, EncodeError> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !is_ffmpeg_on_path() {
            return Err(EncodeError::Ffmpeg(
                "ffmpeg is required for video and GIF export, but was not found on PATH".into(),
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
        ])
        .args(cfg.output_args())
        .arg(&cfg.out_path);

        tracing::debug!(command = ?cmd, "Spawning ffmpeg");
        let mut child = cmd
            .spawn()
            .map_err(|e| EncodeError::Ffmpeg(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EncodeError::Ffmpeg("failed to open ffmpeg stdin".into()))?;
        let stderr = child.stderr.take().map(drain_stderr);

        Ok(Self {
            scratch: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            child: Some(child),
            stdin: Some(stdin),
            stderr,
        })
    }

    pub fn out_path(&self) -> &Path {
        &self.cfg.out_path
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn encode_frame(&mut self, frame: &Framebuffer) -> Result<(), EncodeError> {
        check_frame_size(frame, self.cfg.width, self.cfg.height)?;
        flatten_over_black(&mut self.scratch, frame.as_bytes());

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(EncodeError::Finished);
        };
        stdin.write_all(&self.scratch)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        let stderr = self.stderr.take().map(join_stderr).unwrap_or_default();
        if !status.success() {
            return Err(EncodeError::Ffmpeg(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        tracing::debug!(path = %self.cfg.out_path.display(), "ffmpeg finished");
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // closing stdin lets ffmpeg exit; reap it so no zombie is left behind
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        if let Some(stderr) = self.stderr.take() {
            let _ = stderr.join();
        }
    }
}

/// Read ffmpeg's stderr to the end on its own thread so the pipe never
/// fills, keeping only the last [`STDERR_TAIL`] bytes.
fn drain_stderr<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut tail: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    tail.extend_from_slice(&buf[..n]);
                    if tail.len() > STDERR_TAIL {
                        tail.drain(..tail.len() - STDERR_TAIL);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        String::from_utf8_lossy(&tail).into_owned()
    })
}

fn join_stderr(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

/// Composite straight-alpha RGBA over opaque black.
fn flatten_over_black(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        d[0] = mul_div255(u16::from(s[0]), a) as u8;
        d[1] = mul_div255(u16::from(s[1]), a) as u8;
        d[2] = mul_div255(u16::from(s[2]), a) as u8;
        d[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}
