//! Dithering options and configuration.

/// Smallest working resolution accepted by [`DitherOptions::resolution`].
pub const MIN_RESOLUTION: f32 = 0.05;

/// Per-call dithering configuration.
///
/// # Defaults
///
/// - Intensity: `1.0` (full error / full threshold offset)
/// - Resolution: `1.0` (process at the frame's own size)
///
/// # Example
///
/// ```
/// use retro_dither::DitherOptions;
///
/// let options = DitherOptions::new().intensity(0.5).resolution(0.25);
/// assert_eq!(options.intensity, 0.5);
/// assert_eq!(options.resolution, 0.25);
///
/// // out-of-range values are clamped
/// let options = DitherOptions::new().intensity(3.0).resolution(0.0);
/// assert_eq!(options.intensity, 1.0);
/// assert_eq!(options.resolution, 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// How strongly diffused or ordered error is applied, in `[0, 1]`.
    ///
    /// `0.0` degenerates to plain nearest-color quantization. Only applies
    /// at full resolution; the reduced path always dithers at `1.0`.
    pub intensity: f32,

    /// Working resolution as a fraction of the frame size, in `[0.05, 1]`.
    ///
    /// Values below `1.0` route through the
    /// [`ResolutionScaler`](crate::ResolutionScaler).
    pub resolution: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            resolution: 1.0,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dither intensity, clamped to `[0, 1]`.
    ///
    /// NaN falls back to the default of `1.0`.
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = if intensity.is_nan() {
            1.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        self
    }

    /// Set the working resolution, clamped to `[0.05, 1]`.
    ///
    /// NaN falls back to the default of `1.0`.
    #[inline]
    pub fn resolution(mut self, resolution: f32) -> Self {
        self.resolution = if resolution.is_nan() {
            1.0
        } else {
            resolution.clamp(MIN_RESOLUTION, 1.0)
        };
        self
    }

    /// Whether the options select the reduced-resolution path.
    #[inline]
    pub fn is_scaled(&self) -> bool {
        self.resolution < 1.0
    }
}
