//! Stucki error diffusion dithering algorithm.

use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

use super::{dither_with_kernel, Dither, STUCKI};

/// Stucki error diffusion dithering, two-row variant.
///
/// # Algorithm
///
/// ```text
///            X   8   4
///    2   4   8   4   2
/// ```
///
/// Weights are divided by 42, the divisor of the full three-row Stucki
/// table, so 32/42 of the error propagates. Dark and light regions keep
/// more solid runs than with Floyd-Steinberg.
pub struct Stucki;

impl Dither for Stucki {
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    ) {
        dither_with_kernel(frame, palette, quantizer, &STUCKI, intensity);
    }
}
