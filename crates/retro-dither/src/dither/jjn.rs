//! Jarvis-Judice-Ninke error diffusion dithering algorithm.
//!
//! JJN spreads error over 12 neighbors in three rows, producing smoother
//! gradients than Floyd-Steinberg at roughly three times the work per pixel.

use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

use super::{dither_with_kernel, Dither, JARVIS_JUDICE_NINKE};

/// Jarvis-Judice-Ninke error diffusion dithering.
///
/// # Algorithm
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
///
/// All weights divided by 48 (100% propagation). The error buffer holds
/// three rows and is padded by two pixels on each side.
pub struct JarvisJudiceNinke;

impl Dither for JarvisJudiceNinke {
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    ) {
        dither_with_kernel(frame, palette, quantizer, &JARVIS_JUDICE_NINKE, intensity);
    }
}
