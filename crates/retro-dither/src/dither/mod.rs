//! Ordered and error diffusion dithering.
//!
//! Every algorithm reduces a [`Framebuffer`] to a [`Palette`] in place, using
//! a [`Quantizer`] as its color-reduction primitive. Every written pixel is
//! an exact palette member; alpha is never touched.
//!
//! # Algorithms
//!
//! - **Bayer**: 8x8 ordered threshold matrix, stateless per pixel
//! - **Floyd-Steinberg**: 4 neighbors over 2 rows (/16)
//! - **Sierra**: 7 neighbors over 2 rows (/32)
//! - **Stucki**: 7 neighbors over 2 rows (/42)
//! - **Jarvis-Judice-Ninke**: 12 neighbors over 3 rows (/48)
//!
//! # Architecture
//!
//! All algorithms implement the [`Dither`] trait. The error diffusion family
//! shares [`dither_with_kernel`], which differs per algorithm only by its
//! [`Kernel`] table. [`apply`] is the single entry point that also honors
//! [`DitherOptions::resolution`].
//!
//! # Example
//!
//! ```
//! use retro_dither::dither::{apply, DitherAlgorithm, DitherOptions};
//! use retro_dither::{Framebuffer, NamedPalette, Quantizer};
//!
//! let palette = NamedPalette::Grayscale8.palette();
//! let mut quantizer = Quantizer::new();
//! let mut frame = Framebuffer::filled(16, 16, [100, 100, 100, 255]).unwrap();
//!
//! let options = DitherOptions::new().intensity(1.0).resolution(0.5);
//! apply(&mut frame, &palette, &mut quantizer, DitherAlgorithm::Sierra, &options);
//!
//! assert!(frame.pixels().all(|[r, g, b, _]| palette.contains([r, g, b].into())));
//! ```

mod bayer;
mod floyd_steinberg;
mod jjn;
mod kernel;
mod options;
mod sierra;
mod stucki;

pub use bayer::{Bayer, BAYER_8X8};
pub use floyd_steinberg::FloydSteinberg;
pub use jjn::JarvisJudiceNinke;
pub use kernel::*;
pub use options::{DitherOptions, MIN_RESOLUTION};
pub use sierra::Sierra;
pub use stucki::Stucki;

use std::fmt;
use std::str::FromStr;

use crate::frame::Framebuffer;
use crate::palette::{Palette, Rgb};
use crate::quantize::Quantizer;
use crate::scale::ResolutionScaler;

/// Dither algorithm selection.
///
/// # Example
///
/// ```
/// use retro_dither::DitherAlgorithm;
///
/// let algo: DitherAlgorithm = "floyd-steinberg".parse().unwrap();
/// assert_eq!(algo, DitherAlgorithm::FloydSteinberg);
/// assert_eq!("jjn".parse::<DitherAlgorithm>().unwrap(), DitherAlgorithm::JarvisJudiceNinke);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherAlgorithm {
    /// 8x8 Bayer ordered dithering.
    ///
    /// No error bleeding, stable across frames, the classic "crosshatch"
    /// look.
    Bayer,

    /// Floyd-Steinberg error diffusion (100% propagation).
    #[default]
    FloydSteinberg,

    /// Jarvis-Judice-Ninke error diffusion (100% propagation, 3 rows).
    JarvisJudiceNinke,

    /// Stucki error diffusion (two-row table, /42).
    Stucki,

    /// Sierra error diffusion (two-row table, /32).
    Sierra,
}

impl DitherAlgorithm {
    /// All algorithms, in listing order.
    pub const ALL: [DitherAlgorithm; 5] = [
        DitherAlgorithm::Bayer,
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Sierra,
    ];

    /// Kebab-case identifier, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::Bayer => "bayer",
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::Sierra => "sierra",
        }
    }

    /// The implementation behind this variant.
    pub fn ditherer(self) -> &'static dyn Dither {
        match self {
            DitherAlgorithm::Bayer => &Bayer,
            DitherAlgorithm::FloydSteinberg => &FloydSteinberg,
            DitherAlgorithm::JarvisJudiceNinke => &JarvisJudiceNinke,
            DitherAlgorithm::Stucki => &Stucki,
            DitherAlgorithm::Sierra => &Sierra,
        }
    }

    /// Diffusion kernel, or `None` for ordered dithering.
    pub fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherAlgorithm::Bayer => None,
            DitherAlgorithm::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherAlgorithm::JarvisJudiceNinke => Some(&JARVIS_JUDICE_NINKE),
            DitherAlgorithm::Stucki => Some(&STUCKI),
            DitherAlgorithm::Sierra => Some(&SIERRA),
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dither algorithm '{}' (expected one of: bayer, floyd-steinberg, jarvis-judice-ninke, stucki, sierra)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for DitherAlgorithm {
    type Err = UnknownAlgorithm;

    /// Case-insensitive; accepts `_` for `-` and the short forms `fs`,
    /// `jjn` and `ordered`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "bayer" | "ordered" => Ok(DitherAlgorithm::Bayer),
            "floyd-steinberg" | "floydsteinberg" | "fs" => Ok(DitherAlgorithm::FloydSteinberg),
            "jarvis-judice-ninke" | "jarvis" | "jjn" => Ok(DitherAlgorithm::JarvisJudiceNinke),
            "stucki" => Ok(DitherAlgorithm::Stucki),
            "sierra" => Ok(DitherAlgorithm::Sierra),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Trait for in-place dithering algorithms.
///
/// Implementations process the whole frame at its own size; reduced
/// resolution is handled one level up by [`apply`] and
/// [`ResolutionScaler`].
pub trait Dither: Sync {
    /// Dither `frame` to `palette` in place.
    ///
    /// # Arguments
    ///
    /// * `frame` - Pixels to reduce; RGB is overwritten, alpha is kept
    /// * `palette` - Output colors
    /// * `quantizer` - Nearest-color lookup; must have been reset if it was
    ///   last used with a different palette
    /// * `intensity` - Dither strength in `[0, 1]`
    fn dither(
        &self,
        frame: &mut Framebuffer,
        palette: &Palette,
        quantizer: &mut Quantizer,
        intensity: f32,
    );
}

/// Dither `frame` with `algorithm`, honoring the requested resolution.
///
/// `options.resolution < 1.0` delegates to [`ResolutionScaler`]; otherwise
/// the algorithm runs directly on the frame.
pub fn apply(
    frame: &mut Framebuffer,
    palette: &Palette,
    quantizer: &mut Quantizer,
    algorithm: DitherAlgorithm,
    options: &DitherOptions,
) {
    if options.is_scaled() {
        ResolutionScaler::new(algorithm).apply(
            frame,
            palette,
            quantizer,
            options.intensity,
            options.resolution,
        );
    } else {
        algorithm
            .ditherer()
            .dither(frame, palette, quantizer, options.intensity);
    }
}

/// Ring of padded error rows for error diffusion.
///
/// Holds `depth` rows (the kernel's `max_dy + 1`), each `width + 2 * pad`
/// entries wide. Row `0` relative to `head` is the row being scanned.
/// Diffusion targets left or right of the image land in the padding and are
/// never read back, so only same-row targets need a bounds check.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, pad, depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    /// Index of the current row in `rows`
    head: usize,
    pad: usize,
    width: usize,
}

impl ErrorBuffer {
    /// Create a zeroed buffer.
    ///
    /// # Arguments
    ///
    /// * `width` - Image width in pixels
    /// * `pad` - Padding on each side (kernel's horizontal reach)
    /// * `depth` - Number of rows to track (kernel's `max_dy + 1`)
    pub fn new(width: usize, pad: usize, depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            rows: (0..depth).map(|_| vec![[0.0; 3]; width + 2 * pad]).collect(),
            head: 0,
            pad,
            width,
        }
    }

    /// Image width the buffer was created for.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Accumulated error for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[self.head][x + self.pad]
    }

    /// Accumulate error into a pixel `row_offset` rows below the current one.
    ///
    /// `x` may lie up to `pad` pixels outside the image on either side.
    /// `row_offset` must be below the buffer depth.
    #[inline]
    pub fn add_error(&mut self, x: isize, row_offset: usize, error: [f32; 3]) {
        let depth = self.rows.len();
        let row = &mut self.rows[(self.head + row_offset) % depth];
        let cell = &mut row[(x + self.pad as isize) as usize];
        for c in 0..3 {
            cell[c] += error[c];
        }
    }

    /// Zero the consumed row and make the next one current.
    pub fn advance_row(&mut self) {
        self.rows[self.head].fill([0.0; 3]);
        self.head = (self.head + 1) % self.rows.len();
    }
}

/// Quantize an adjusted (possibly fractional) color through the cache.
#[inline]
pub(crate) fn quantize_channels(adjusted: [f32; 3], palette: &Palette, quantizer: &mut Quantizer) -> Rgb {
    let key = Rgb::new(
        to_u8(adjusted[0]),
        to_u8(adjusted[1]),
        to_u8(adjusted[2]),
    );
    quantizer.nearest(key, palette)
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Core error diffusion loop parameterized by kernel.
///
/// Raster order, left to right and top to bottom. For each pixel:
///
/// 1. add `intensity` times the accumulated error to the source channels
///    and clamp to `[0, 255]`
/// 2. quantize through `quantizer`
/// 3. diffuse `(adjusted - quantized) * weight / divisor` to each kernel
///    target
///
/// Same-row targets past the right edge are skipped so error never wraps
/// onto the next scanline. Targets on later rows may fall into the padding
/// or into rows past the bottom edge; both are discarded.
pub(crate) fn dither_with_kernel(
    frame: &mut Framebuffer,
    palette: &Palette,
    quantizer: &mut Quantizer,
    kernel: &Kernel,
    intensity: f32,
) {
    let width = frame.width();
    let height = frame.height();
    let mut error_buf = ErrorBuffer::new(width, kernel.reach, kernel.rows());
    let divisor = kernel.divisor as f32;
    let data = frame.as_bytes_mut();

    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) * 4;
            let accumulated = error_buf.get_accumulated(x);

            let mut adjusted = [0.0f32; 3];
            for c in 0..3 {
                adjusted[c] = (data[i + c] as f32 + accumulated[c] * intensity).clamp(0.0, 255.0);
            }

            let nearest = quantize_channels(adjusted, palette, quantizer);
            let out = nearest.to_array();
            data[i..i + 3].copy_from_slice(&out);

            let residual = [
                adjusted[0] - out[0] as f32,
                adjusted[1] - out[1] as f32,
                adjusted[2] - out[2] as f32,
            ];

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as isize + dx as isize;
                if dy == 0 && nx >= width as isize {
                    continue;
                }
                let share = weight as f32 / divisor;
                error_buf.add_error(
                    nx,
                    dy as usize,
                    [residual[0] * share, residual[1] * share, residual[2] * share],
                );
            }
        }

        error_buf.advance_row();
    }
}
