//! Public API for the retro-dither crate.
//!
//! This module provides the high-level API: the [`RetroDitherer`] builder and
//! the [`DitherError`] unified error type.

mod builder;
mod error;

pub use builder::RetroDitherer;
pub use error::DitherError;
