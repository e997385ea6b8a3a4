//! Floyd-Steinberg error diffusion dithering algorithm.
//!
//! Floyd-Steinberg is the most widely known error diffusion algorithm. It
//! distributes all of the quantization error to 4 neighbors, giving the
//! smooth, slightly wormy texture typical of 90s GIFs.

use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

use super::{dither_with_kernel, Dither, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// # Algorithm
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// The error buffer holds two rows.
///
/// # Example
///
/// ```
/// use retro_dither::dither::{Dither, FloydSteinberg};
/// use retro_dither::{Framebuffer, Palette, Quantizer, Rgb};
///
/// let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// let mut frame = Framebuffer::filled(8, 8, [127, 127, 127, 255]).unwrap();
/// FloydSteinberg.dither(&mut frame, &palette, &mut Quantizer::new(), 1.0);
///
/// let white = frame.pixels().filter(|p| p[0] == 255).count();
/// assert!(white > 16 && white < 48);
/// ```
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    ) {
        dither_with_kernel(frame, palette, quantizer, &FLOYD_STEINBERG, intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;

    fn create_test_palette() -> Palette {
        Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap()
    }

    #[test]
    fn test_floyd_steinberg_basic() {
        let palette = create_test_palette();
        let mut frame = Framebuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();

        FloydSteinberg.dither(&mut frame, &palette, &mut Quantizer::new(), 1.0);

        let pixels: Vec<_> = frame.pixels().collect();
        assert!(pixels.contains(&[0, 0, 0, 255]));
        assert!(pixels.contains(&[255, 255, 255, 255]));
    }

    #[test]
    fn test_floyd_steinberg_first_pixels() {
        // 128 -> white leaves -127; 7/16 of it pushes the right neighbor
        // to 128 - 55.56 = 72.4 -> black.
        let palette = create_test_palette();
        let mut frame = Framebuffer::filled(4, 1, [128, 128, 128, 255]).unwrap();

        FloydSteinberg.dither(&mut frame, &palette, &mut Quantizer::new(), 1.0);

        assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_floyd_steinberg_intensity_scales_accumulated_error() {
        // Right neighbor reads -127 * 7/16 * 0.5 = -27.8 -> 100.2 -> black.
        // Third pixel reads +100.2 * 7/16 * 0.5 = +21.9 -> 149.9 -> white.
        let palette = create_test_palette();
        let mut half = Framebuffer::filled(3, 1, [128, 128, 128, 255]).unwrap();
        FloydSteinberg.dither(&mut half, &palette, &mut Quantizer::new(), 0.5);
        assert_eq!(half.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(half.pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(half.pixel(2, 0), [255, 255, 255, 255]);

        let mut off = Framebuffer::filled(3, 1, [128, 128, 128, 255]).unwrap();
        FloydSteinberg.dither(&mut off, &palette, &mut Quantizer::new(), 0.0);
        assert!(off.pixels().all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_single_pixel() {
        let palette = create_test_palette();
        let mut frame = Framebuffer::filled(1, 1, [200, 200, 200, 7]).unwrap();
        FloydSteinberg.dither(&mut frame, &palette, &mut Quantizer::new(), 1.0);
        assert_eq!(frame.pixel(0, 0), [255, 255, 255, 7]);
    }
}
