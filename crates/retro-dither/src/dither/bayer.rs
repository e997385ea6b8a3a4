//! Ordered dithering with an 8x8 Bayer matrix.

use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

use super::{quantize_channels, Dither};

/// 8x8 Bayer threshold matrix, values 0-63.
///
/// Recursive construction from the 2x2 base `[[0, 2], [3, 1]]`; adjacent
/// thresholds are maximally far apart.
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Ordered dithering using [`BAYER_8X8`].
///
/// # Algorithm
///
/// For pixel `(x, y)` the cell `BAYER_8X8[y % 8][x % 8]` is centered by
/// subtracting 32 and scaled by `255 * intensity / 64`. The resulting offset
/// (between roughly -127 and +123 at full intensity) is added to all three
/// channels before quantization.
///
/// No state is carried between pixels, so the pattern is stable from frame
/// to frame and never bleeds across edges.
pub struct Bayer;

impl Bayer {
    /// Offset added to every channel of pixel `(x, y)`.
    #[inline]
    pub fn offset(x: usize, y: usize, intensity: f32) -> f32 {
        let threshold = BAYER_8X8[y % 8][x % 8] as f32 - 32.0;
        threshold * 255.0 * intensity / 64.0
    }
}

impl Dither for Bayer {
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    ) {
        let width = frame.width();
        let data = frame.as_bytes_mut();

        for (idx, px) in data.chunks_exact_mut(4).enumerate() {
            let offset = Bayer::offset(idx % width, idx / width, intensity);
            let adjusted = [
                (px[0] as f32 + offset).clamp(0.0, 255.0),
                (px[1] as f32 + offset).clamp(0.0, 255.0),
                (px[2] as f32 + offset).clamp(0.0, 255.0),
            ];
            let nearest = quantize_channels(adjusted, palette, quantizer);
            px[..3].copy_from_slice(&nearest.to_array());
        }
    }
}
