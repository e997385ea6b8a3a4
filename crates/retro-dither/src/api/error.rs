//! Unified error type for the retro-dither public API.
//!
//! [`DitherError`] wraps every error type in the crate into a single enum
//! for convenient `?` propagation in application code.

use std::fmt;

use crate::dither::UnknownAlgorithm;
use crate::frame::FramebufferError;
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the retro-dither public API.
///
/// # Example
///
/// ```
/// use retro_dither::{DitherAlgorithm, DitherError, Palette};
///
/// fn configure(colors: &[&str], algo: &str) -> Result<(Palette, DitherAlgorithm), DitherError> {
///     let palette = Palette::from_hex(colors)?;
///     let algorithm = algo.parse()?;
///     Ok((palette, algorithm))
/// }
///
/// assert!(configure(&["#000", "#fff"], "bayer").is_ok());
/// assert!(matches!(configure(&[], "bayer"), Err(DitherError::Palette(_))));
/// assert!(matches!(configure(&["#000"], "dots"), Err(DitherError::Algorithm(_))));
/// ```
#[derive(Debug)]
pub enum DitherError {
    /// Palette validation error (empty, duplicate, unknown name or parse error)
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
    /// Framebuffer construction error (zero size or wrong data length)
    Framebuffer(FramebufferError),
    /// Unrecognized algorithm name
    Algorithm(UnknownAlgorithm),
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::ParseColor(err) => write!(f, "color parse error: {}", err),
            DitherError::Framebuffer(err) => write!(f, "framebuffer error: {}", err),
            DitherError::Algorithm(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            DitherError::ParseColor(err) => Some(err),
            DitherError::Framebuffer(err) => Some(err),
            DitherError::Algorithm(err) => Some(err),
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}

impl From<ParseColorError> for DitherError {
    fn from(err: ParseColorError) -> Self {
        DitherError::ParseColor(err)
    }
}

impl From<FramebufferError> for DitherError {
    fn from(err: FramebufferError) -> Self {
        DitherError::Framebuffer(err)
    }
}

impl From<UnknownAlgorithm> for DitherError {
    fn from(err: UnknownAlgorithm) -> Self {
        DitherError::Algorithm(err)
    }
}
