//! Reduced-resolution processing and block effects.
//!
//! [`ResolutionScaler`] runs any [`DitherAlgorithm`] on a box-downsampled
//! copy of the frame and scales the result back up with nearest-neighbor
//! sampling, so dither cells come out as crisp square blocks.
//!
//! ```text
//! frame (W x H) --box average--> scratch (w x h) --dither--> scratch
//!       ^                                                       |
//!       +------------- nearest-neighbor, RGB only --------------+
//! ```

mod pixelate;

pub use pixelate::pixelate;

use crate::dither::DitherAlgorithm;
use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;

/// Size of the working buffer for `resolution`.
///
/// Each dimension is `max(2, floor(dim * resolution))`, but never larger
/// than the source dimension.
pub fn scaled_dimensions(width: usize, height: usize, resolution: f32) -> (usize, usize) {
    let scale = |dim: usize| {
        let scaled = (dim as f64 * resolution as f64).floor() as usize;
        scaled.max(2).min(dim)
    };
    (scale(width), scale(height))
}

/// Box-downsample `src` to `width x height`.
///
/// Destination cell `(x, y)` averages the source pixels in
/// `[x * W / width, (x + 1) * W / width)` and the matching row span, using
/// integer division. Every cell covers at least one source pixel. All four
/// channels are averaged.
///
/// # Panics
///
/// Panics if the target is zero-sized or larger than `src`.
pub fn box_downsample(src: &Framebuffer, width: usize, height: usize) -> Framebuffer {
    assert!(
        width > 0 && height > 0 && width <= src.width() && height <= src.height(),
        "invalid downsample target {}x{} for {}x{} source",
        width,
        height,
        src.width(),
        src.height()
    );

    let (sw, sh) = (src.width(), src.height());
    let bytes = src.as_bytes();
    let mut out = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        let y0 = y * sh / height;
        let y1 = ((y + 1) * sh / height).max(y0 + 1);
        for x in 0..width {
            let x0 = x * sw / width;
            let x1 = ((x + 1) * sw / width).max(x0 + 1);

            let mut sum = [0u32; 4];
            for sy in y0..y1 {
                let row = sy * sw * 4;
                for sx in x0..x1 {
                    let i = row + sx * 4;
                    for c in 0..4 {
                        sum[c] += bytes[i + c] as u32;
                    }
                }
            }

            let count = ((x1 - x0) * (y1 - y0)) as u32;
            for c in 0..4 {
                out.push(((sum[c] + count / 2) / count) as u8);
            }
        }
    }

    Framebuffer::from_raw(width, height, out)
}

/// Nearest-neighbor upsample of `small` into `dst`, RGB only.
///
/// Destination pixel `(x, y)` takes the color of
/// `small[x * w / W, y * h / H]`. Alpha in `dst` is left untouched.
pub fn upsample_nearest_rgb(small: &Framebuffer, dst: &mut Framebuffer) {
    let (w, h) = (small.width(), small.height());
    let (dw, dh) = (dst.width(), dst.height());
    let src = small.as_bytes();
    let out = dst.as_bytes_mut();

    for y in 0..dh {
        let sy = y * h / dh;
        for x in 0..dw {
            let sx = x * w / dw;
            let s = (sy * w + sx) * 4;
            let d = (y * dw + x) * 4;
            out[d..d + 3].copy_from_slice(&src[s..s + 3]);
        }
    }
}

/// Wraps a dithering algorithm to run at a reduced working resolution.
///
/// # Example
///
/// ```
/// use retro_dither::{DitherAlgorithm, Framebuffer, NamedPalette, Quantizer, ResolutionScaler};
///
/// let palette = NamedPalette::Cga.palette();
/// let mut frame = Framebuffer::filled(40, 30, [90, 140, 200, 255]).unwrap();
///
/// ResolutionScaler::new(DitherAlgorithm::Bayer)
///     .apply(&mut frame, &palette, &mut Quantizer::new(), 1.0, 0.25);
///
/// // the top-left 4x4 block maps onto a single scratch pixel
/// assert_eq!(frame.pixel(0, 0), frame.pixel(3, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionScaler {
    algorithm: DitherAlgorithm,
}

impl ResolutionScaler {
    /// Wrap `algorithm`.
    pub fn new(algorithm: DitherAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The wrapped algorithm.
    pub fn algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// Dither `frame` at `resolution` times its size.
    ///
    /// With `resolution >= 1.0` this is exactly the wrapped algorithm
    /// applied to `frame` with `intensity`. Otherwise the frame is
    /// box-downsampled into a temporary buffer, dithered there at full
    /// intensity and scaled back up over the original RGB; the temporary is
    /// dropped before returning. `intensity` does not apply to the reduced
    /// path.
    pub fn apply(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
        resolution: f32,
    ) {
        let ditherer = self.algorithm.ditherer();
        if resolution >= 1.0 || resolution.is_nan() {
            ditherer.dither(frame, palette, quantizer, intensity);
            return;
        }

        let (w, h) = scaled_dimensions(frame.width(), frame.height(), resolution);
        let mut small = box_downsample(frame, w, h);
        ditherer.dither(&mut small, palette, quantizer, 1.0);
        upsample_nearest_rgb(&small, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(100, 50, 0.5), (50, 25));
        assert_eq!(scaled_dimensions(101, 51, 0.5), (50, 25));
        assert_eq!(scaled_dimensions(100, 50, 0.05), (5, 2));
        assert_eq!(scaled_dimensions(10, 10, 0.05), (2, 2));
    }

    #[test]
    fn test_scaled_dimensions_never_upscale() {
        assert_eq!(scaled_dimensions(1, 1, 0.5), (1, 1));
        assert_eq!(scaled_dimensions(1, 40, 0.5), (1, 20));
    }

    #[test]
    fn test_box_downsample_averages() {
        let mut src = Framebuffer::new(4, 2).unwrap();
        src.set_pixel(0, 0, [0, 0, 0, 255]);
        src.set_pixel(1, 0, [100, 100, 100, 255]);
        src.set_pixel(0, 1, [200, 200, 200, 255]);
        src.set_pixel(1, 1, [100, 100, 100, 255]);
        for y in 0..2 {
            for x in 2..4 {
                src.set_pixel(x, y, [10, 20, 30, 40]);
            }
        }

        let small = box_downsample(&src, 2, 1);
        assert_eq!(small.pixel(0, 0), [100, 100, 100, 255]);
        assert_eq!(small.pixel(1, 0), [10, 20, 30, 40]);
    }

    #[test]
    fn test_box_downsample_uneven_ratio_covers_every_source_pixel() {
        // 5 -> 2: cells cover [0, 2) and [2, 5)
        let mut src = Framebuffer::filled(5, 1, [0, 0, 0, 255]).unwrap();
        src.set_pixel(4, 0, [255, 255, 255, 255]);
        let small = box_downsample(&src, 2, 1);
        assert_eq!(small.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(small.pixel(1, 0), [85, 85, 85, 255]);
    }

    #[test]
    fn test_upsample_copies_rgb_keeps_alpha() {
        let mut small = Framebuffer::new(2, 1).unwrap();
        small.set_pixel(0, 0, [1, 2, 3, 0]);
        small.set_pixel(1, 0, [4, 5, 6, 0]);
        let mut dst = Framebuffer::filled(4, 2, [0, 0, 0, 77]).unwrap();

        upsample_nearest_rgb(&small, &mut dst);

        assert_eq!(dst.pixel(0, 0), [1, 2, 3, 77]);
        assert_eq!(dst.pixel(1, 1), [1, 2, 3, 77]);
        assert_eq!(dst.pixel(2, 0), [4, 5, 6, 77]);
        assert_eq!(dst.pixel(3, 1), [4, 5, 6, 77]);
    }

    #[test]
    fn test_scaler_at_full_resolution_matches_direct_call() {
        let palette = Palette::new(&[
            Rgb::new(0, 0, 0),
            Rgb::new(255, 0, 0),
            Rgb::new(255, 255, 255),
        ])
        .unwrap();
        let mut src = Framebuffer::new(13, 7).unwrap();
        for y in 0..7 {
            for x in 0..13 {
                src.set_pixel(x, y, [(x * 19) as u8, (y * 31) as u8, 77, 255]);
            }
        }

        for algo in DitherAlgorithm::ALL {
            let mut direct = src.clone();
            algo.ditherer()
                .dither(&mut direct, &palette, &mut Quantizer::new(), 0.8);

            let mut scaled = src.clone();
            ResolutionScaler::new(algo).apply(&mut scaled, &palette, &mut Quantizer::new(), 0.8, 1.0);

            assert_eq!(direct, scaled, "{} differs at resolution 1.0", algo);
        }
    }

    #[test]
    fn test_reduced_resolution_dithers_at_full_intensity() {
        let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        let src = Framebuffer::filled(16, 16, [127, 127, 127, 255]).unwrap();

        // intensity 0 at full size is plain quantization: all black
        let mut full = src.clone();
        ResolutionScaler::new(DitherAlgorithm::FloydSteinberg).apply(
            &mut full,
            &palette,
            &mut Quantizer::new(),
            0.0,
            1.0,
        );
        assert!(full.pixels().all(|p| p == [0, 0, 0, 255]));

        // the reduced path ignores intensity and still diffuses
        let mut reduced = src.clone();
        ResolutionScaler::new(DitherAlgorithm::FloydSteinberg).apply(
            &mut reduced,
            &palette,
            &mut Quantizer::new(),
            0.0,
            0.5,
        );
        let white = reduced.pixels().filter(|p| p[0] == 255).count();
        assert!(white > 0 && white < 256, "expected a dither pattern, got {} white", white);
        assert_ne!(reduced, full);
    }

    #[test]
    fn test_scaler_produces_blocks() {
        let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        let mut frame = Framebuffer::filled(16, 16, [127, 127, 127, 255]).unwrap();

        ResolutionScaler::new(DitherAlgorithm::FloydSteinberg).apply(
            &mut frame,
            &palette,
            &mut Quantizer::new(),
            1.0,
            0.5,
        );

        for by in 0..8 {
            for bx in 0..8 {
                let p = frame.pixel(bx * 2, by * 2);
                assert_eq!(frame.pixel(bx * 2 + 1, by * 2), p);
                assert_eq!(frame.pixel(bx * 2, by * 2 + 1), p);
                assert_eq!(frame.pixel(bx * 2 + 1, by * 2 + 1), p);
            }
        }
    }
}
