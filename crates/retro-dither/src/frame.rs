//! RGBA8 framebuffer type.
//!
//! [`Framebuffer`] is the unit of work for every stage of the pipeline: a
//! contiguous, row-major buffer of `width * height` RGBA pixels with 8 bits
//! per channel. Stages mutate it in place.

use std::fmt;

/// Error type for framebuffer construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramebufferError {
    /// Width or height is zero
    ZeroDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Pixel data length does not equal `width * height * 4`
    LengthMismatch {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::ZeroDimensions { width, height } => {
                write!(f, "framebuffer dimensions must be non-zero, got {}x{}", width, height)
            }
            FramebufferError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "framebuffer data length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for FramebufferError {}

/// A rectangular grid of RGBA8 pixels, row-major and contiguous.
///
/// Dimensions are validated at construction, so every `Framebuffer` has at
/// least one pixel and a data length of exactly `width * height * 4`.
///
/// # Example
///
/// ```
/// use retro_dither::Framebuffer;
///
/// let mut frame = Framebuffer::filled(2, 2, [10, 20, 30, 255]).unwrap();
/// frame.set_pixel(1, 0, [0, 0, 0, 128]);
///
/// assert_eq!(frame.pixel(1, 0), [0, 0, 0, 128]);
/// assert_eq!(frame.as_bytes().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Framebuffer {
    /// Create a fully transparent black framebuffer.
    pub fn new(width: usize, height: usize) -> Result<Self, FramebufferError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a framebuffer with every pixel set to `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self, FramebufferError> {
        check_dimensions(width, height)?;
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::ZeroDimensions`] for an empty grid and
    /// [`FramebufferError::LengthMismatch`] when `data.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> Result<Self, FramebufferError> {
        check_dimensions(width, height)?;
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(FramebufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Assemble a framebuffer whose invariants the caller already upholds.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert!(width > 0 && height > 0 && data.len() == width * height * 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always `false`; empty framebuffers are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the framebuffer, returning the RGBA bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} framebuffer",
            x,
            y,
            self.width,
            self.height
        );
        (y * self.width + x) * 4
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), FramebufferError> {
    if width == 0 || height == 0 {
        return Err(FramebufferError::ZeroDimensions { width, height });
    }
    Ok(())
}
