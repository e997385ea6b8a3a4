//! Palette types and the built-in retro palettes
//!
//! This module provides the [`Rgb`] triple, the validated [`Palette`]
//! container, the closed set of [`NamedPalette`]s, and the error types for
//! parsing and validation.

mod error;
mod named;
mod palette;
mod rgb;

pub use error::{PaletteError, ParseColorError};
pub use named::NamedPalette;
pub use palette::Palette;
pub use rgb::Rgb;
