//! Nearest-palette-color quantization with memoization.
//!
//! [`Quantizer`] is the color-reduction primitive used by every dithering
//! algorithm. It wraps the linear scan in [`Palette::nearest`] with a
//! [`QuantizeCache`] keyed by the packed input color.
//!
//! # Cache Invalidation
//!
//! The cache does not know which palette produced its entries. Call
//! [`Quantizer::reset`] before quantizing against a different palette:
//!
//! ```
//! use retro_dither::{NamedPalette, Quantizer, Rgb};
//!
//! let mut quantizer = Quantizer::new();
//! let cga = NamedPalette::Cga.palette();
//! let c64 = NamedPalette::C64.palette();
//!
//! let a = quantizer.nearest(Rgb::new(10, 10, 10), &cga);
//! assert!(cga.contains(a));
//!
//! quantizer.reset();
//! let b = quantizer.nearest(Rgb::new(200, 60, 40), &c64);
//! assert!(c64.contains(b));
//! ```

mod cache;

pub use cache::{QuantizeCache, DEFAULT_CAPACITY};

use crate::palette::{Palette, Rgb};

/// Memoizing nearest-color lookup.
///
/// Owns its [`QuantizeCache`]; there is no process-wide shared state.
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    cache: QuantizeCache,
    hits: u64,
    misses: u64,
}

impl Quantizer {
    /// Create a quantizer with the default cache capacity (8192 entries).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quantizer with a custom cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: QuantizeCache::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Nearest palette color to `color`.
    ///
    /// Returns the cached answer when present; otherwise scans the palette
    /// (first entry wins ties) and stores the result, possibly evicting the
    /// oldest cache entry.
    #[inline]
    pub fn nearest(&mut self, color: Rgb, palette: &Palette) -> Rgb {
        let key = color.key();
        if let Some(hit) = self.cache.get(key) {
            self.hits += 1;
            return hit;
        }

        self.misses += 1;
        let nearest = palette.nearest(color);
        self.cache.insert(key, nearest);
        nearest
    }

    /// Forget every cached result and zero the hit/miss counters.
    ///
    /// Required whenever the active palette changes.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of lookups answered from the cache since the last reset.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that required a palette scan since the last reset.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// The underlying cache.
    #[inline]
    pub fn cache(&self) -> &QuantizeCache {
        &self.cache
    }
}
