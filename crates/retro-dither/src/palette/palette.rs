//! Validated, immutable palette container.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use super::rgb::Rgb;

/// An ordered, non-empty set of distinct output colors.
///
/// Order only matters for ties: when two entries are equally close to a
/// color, the one listed first wins.
///
/// # Example
///
/// ```
/// use retro_dither::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert!(palette.contains(Rgb::new(255, 255, 255)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::DuplicateColor`] if a color appears twice
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex color strings (`#rgb` or `#rrggbb`).
    ///
    /// ```
    /// use retro_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#ff004d", "#FFF1E8"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(&parsed)
    }

    /// Wrap a built-in table without re-validating it.
    ///
    /// The tables are checked by the named palette tests.
    pub(super) fn from_table(colors: &'static [Rgb]) -> Self {
        Self {
            colors: colors.to_vec(),
        }
    }

    /// Number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at index `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// All colors, in definition order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Whether `color` is an exact palette member.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Nearest palette color by squared Euclidean distance, uncached.
    ///
    /// Scans every entry and keeps the first strictly smaller distance, so
    /// the earliest entry wins ties. Prefer
    /// [`Quantizer::nearest`](crate::Quantizer::nearest) in per-pixel loops.
    pub fn nearest(&self, color: Rgb) -> Rgb {
        let mut best = self.colors[0];
        let mut best_dist = color.distance_sq(best);

        for &candidate in &self.colors[1..] {
            let dist = color.distance_sq(candidate);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }

        best
    }
}
