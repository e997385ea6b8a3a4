//! The render surface contract and the conversion from tiny-skia pixmaps
//! (premultiplied) to retro-dither framebuffers (straight alpha).

use retro_dither::{Framebuffer, FramebufferError};
use tiny_skia::Pixmap;

use crate::error::CaptureError;

/// A scene that can be sampled at an arbitrary point in time.
pub trait RenderSurface: Send {
    /// Size of every captured pixmap.
    fn dimensions(&self) -> (u32, u32);

    /// Render the scene at `t` seconds.
    ///
    /// Errors are transient: the scheduler logs them and tries again on the
    /// next tick.
    fn capture(&mut self, t: f64) -> Result<Pixmap, CaptureError>;
}

/// Copy a pixmap into a straight-alpha framebuffer.
pub fn pixmap_to_frame(pixmap: &Pixmap) -> Result<Framebuffer, FramebufferError> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Framebuffer::from_rgba(data, pixmap.width() as usize, pixmap.height() as usize)
}
