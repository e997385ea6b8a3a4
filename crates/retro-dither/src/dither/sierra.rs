//! Sierra error diffusion dithering algorithm.

use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

use super::{dither_with_kernel, Dither, SIERRA};

/// Sierra error diffusion dithering, two-row variant.
///
/// # Algorithm
///
/// ```text
///            X   5   3
///    2   4   5   4   2
/// ```
///
/// Weights are divided by 32, the divisor of full Sierra, so 25/32 of the
/// error propagates.
pub struct Sierra;

impl Dither for Sierra {
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    ) {
        dither_with_kernel(frame, palette, quantizer, &SIERRA, intensity);
    }
}
