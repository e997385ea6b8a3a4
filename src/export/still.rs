//! Single processed frames for previews and `retroloop still`.

use retro_dither::Framebuffer;

use super::pipeline::{EffectChain, FrameCompositor};
use crate::error::ExportError;
use crate::models::EffectSettings;
use crate::rendering::RenderSurface;

/// Capture `source` at `t` and run it through a fresh effect chain.
pub fn render_still<S: RenderSurface + ?Sized>(
    source: &mut S,
    effects: &EffectSettings,
    width: u32,
    height: u32,
    scratch_scale: f32,
    t: f64,
) -> Result<Framebuffer, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidSettings(format!(
            "frame size must be non-zero, got {width}x{height}"
        )));
    }
    let chain = EffectChain::from_settings(effects)?;
    let mut compositor =
        FrameCompositor::new(source.dimensions(), width, height, scratch_scale, chain)?;
    let pixmap = source.capture(t)?;
    compositor.compose(&pixmap)
}
