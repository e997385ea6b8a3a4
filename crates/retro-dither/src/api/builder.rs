//! RetroDitherer builder -- the primary ergonomic entry point for the crate.
//!
//! [`RetroDitherer`] owns a palette, an algorithm, the dither options, an
//! optional pixelation block size and the [`Quantizer`] whose cache must stay
//! in step with the palette.

use crate::dither::{self, DitherAlgorithm, DitherOptions};
use crate::frame::Framebuffer;
use crate::palette::Palette;
use crate::quantize::Quantizer;
use crate::scale::pixelate;

use super::DitherError;

/// High-level, reusable dithering pipeline.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`process()`](Self::process) takes `&mut self` because the quantizer
///   cache is carried from frame to frame
/// - [`set_palette()`](Self::set_palette) is the only way to change the
///   palette afterwards, and it always resets the cache
///
/// # Example
///
/// ```
/// use retro_dither::{DitherAlgorithm, Framebuffer, NamedPalette, RetroDitherer};
///
/// let mut ditherer = RetroDitherer::new(NamedPalette::C64.palette())
///     .algorithm(DitherAlgorithm::Bayer)
///     .pixel_size(2)
///     .resolution(0.5);
///
/// let mut frame = Framebuffer::filled(32, 32, [30, 160, 90, 255]).unwrap();
/// ditherer.process(&mut frame);
///
/// ditherer.set_palette(NamedPalette::Cga.palette());
/// ditherer.process(&mut frame);
/// let cga = NamedPalette::Cga.palette();
/// assert!(frame.pixels().all(|[r, g, b, _]| cga.contains([r, g, b].into())));
/// ```
#[derive(Debug, Clone)]
pub struct RetroDitherer {
    palette: Palette,
    algorithm: DitherAlgorithm,
    options: DitherOptions,
    pixel_size: usize,
    quantizer: Quantizer,
}

impl RetroDitherer {
    /// Create a ditherer for `palette`.
    ///
    /// Defaults: Floyd-Steinberg, intensity 1.0, resolution 1.0, no
    /// pixelation.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            algorithm: DitherAlgorithm::default(),
            options: DitherOptions::default(),
            pixel_size: 1,
            quantizer: Quantizer::new(),
        }
    }

    /// Create a ditherer from hex color strings.
    pub fn from_hex(colors: &[&str]) -> Result<Self, DitherError> {
        Ok(Self::new(Palette::from_hex(colors)?))
    }

    /// Set the dithering algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the dither intensity, clamped to `[0, 1]`.
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.options = self.options.intensity(intensity);
        self
    }

    /// Set the working resolution, clamped to `[0.05, 1]`.
    #[inline]
    pub fn resolution(mut self, resolution: f32) -> Self {
        self.options = self.options.resolution(resolution);
        self
    }

    /// Set the pixelation block size; `0` and `1` disable pixelation.
    #[inline]
    pub fn pixel_size(mut self, pixel_size: usize) -> Self {
        self.pixel_size = pixel_size.max(1);
        self
    }

    /// Replace the palette and drop every cached lookup.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.quantizer.reset();
    }

    /// The active palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The selected algorithm.
    pub fn selected_algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// The effective (clamped) options.
    pub fn options(&self) -> DitherOptions {
        self.options
    }

    /// The quantizer, for cache statistics.
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Run the configured chain on `frame` in place.
    ///
    /// 1. Pixelate (when `pixel_size > 1`)
    /// 2. Dither, at reduced resolution when `resolution < 1`
    pub fn process(&mut self, frame: &mut Framebuffer) {
        pixelate(frame, self.pixel_size);
        dither::apply(
            frame,
            &self.palette,
            &mut self.quantizer,
            self.algorithm,
            &self.options,
        );
    }

    /// Run the chain on raw RGBA bytes, returning the processed frame.
    pub fn process_rgba(
        &mut self,
        data: Vec<u8>,
        width: usize,
        height: usize,
    ) -> Result<Framebuffer, DitherError> {
        let mut frame = Framebuffer::from_rgba(data, width, height)?;
        self.process(&mut frame);
        Ok(frame)
    }
}
