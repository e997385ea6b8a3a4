#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! retro-dither: palette quantization and dithering for retro-styled frames
//!
//! This library reduces RGBA framebuffers to small, fixed hardware palettes
//! (CGA, C64, ZX Spectrum, PICO-8, ...) using ordered or error diffusion
//! dithering. It is the raster core of the retroloop exporter, but it has no
//! dependencies and can be used on its own.
//!
//! # Quick Start
//!
//! The [`RetroDitherer`] builder is the primary entry point:
//!
//! ```
//! use retro_dither::{DitherAlgorithm, Framebuffer, NamedPalette, RetroDitherer};
//!
//! let mut ditherer = RetroDitherer::new(NamedPalette::Pico8.palette())
//!     .algorithm(DitherAlgorithm::FloydSteinberg)
//!     .intensity(0.8);
//!
//! let mut frame = Framebuffer::filled(4, 4, [120, 64, 200, 255]).unwrap();
//! ditherer.process(&mut frame);
//!
//! let palette = ditherer.palette();
//! assert!(frame.pixels().all(|[r, g, b, _]| palette.contains([r, g, b].into())));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Framebuffer (RGBA8, row-major)
//!     |
//!     +--[resolution < 1]--> box downsample --> dither --> nearest upsample
//!     |
//!     +--[resolution = 1]--> dither in place
//!                               |
//!                               v
//!                     Quantizer (linear scan + QuantizeCache)
//! ```
//!
//! Every pixel written by the pipeline is an exact palette member and the
//! alpha channel is never modified.
//!
//! # Color Distance
//!
//! Matching uses squared Euclidean distance on raw 8-bit sRGB values. No
//! linearization or perceptual space is involved: the palettes are small,
//! fixed and chosen for their look rather than for accurate reproduction.
//! When two palette entries are equally close, the earlier entry wins.
//!
//! # Cache Discipline
//!
//! [`Quantizer`] memoizes nearest-color lookups in a bounded
//! [`QuantizeCache`]. The cache is not partitioned by palette, so it must be
//! reset whenever the active palette changes. [`RetroDitherer::set_palette`]
//! does this for you; code driving a [`Quantizer`] directly must call
//! [`Quantizer::reset`] itself.

pub mod api;
pub mod dither;
pub mod frame;
pub mod palette;
pub mod quantize;
pub mod scale;


pub use api::{DitherError, RetroDitherer};
pub use dither::{DitherAlgorithm, DitherOptions, UnknownAlgorithm};
pub use frame::{Framebuffer, FramebufferError};
pub use palette::{NamedPalette, Palette, PaletteError, ParseColorError, Rgb};
pub use quantize::{QuantizeCache, Quantizer};
pub use scale::{pixelate, ResolutionScaler};
