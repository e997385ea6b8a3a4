//! Error diffusion kernel definitions.
//!
//! Each kernel lists the not-yet-visited neighbors that receive a share of a
//! pixel's quantization error, in raster scan order (left to right, top to
//! bottom).

/// An error diffusion kernel.
///
/// # Error Propagation
///
/// The fraction of error propagated is `sum(weights) / divisor`. The
/// Floyd-Steinberg and Jarvis-Judice-Ninke tables propagate all of it. The
/// two-row Sierra and Stucki tables used here keep their classic divisors
/// while dropping the third row, so they propagate 25/32 and 32/42
/// respectively and read slightly crisper.
///
/// # Buffer Sizing
///
/// `max_dy` determines the ring depth of the error buffer (`max_dy + 1`
/// rows); `reach` is the padding added to both horizontal edges.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: rows below the current one (0 = same row)
    /// - `weight`: numerator; the divisor is shared
    pub entries: &'static [(i32, i32, u8)],

    /// Normalizing divisor. Each neighbor receives `error * weight / divisor`.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,

    /// Maximum |dx| value in entries.
    pub reach: usize,
}

impl Kernel {
    /// Number of rows the error buffer must hold.
    #[inline]
    pub fn rows(&self) -> usize {
        self.max_dy + 1
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
    reach: 1,
};

/// Jarvis-Judice-Ninke dithering kernel.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    max_dy: 2,
    reach: 2,
};

/// Stucki dithering kernel, first two rows.
///
/// ```text
///            X   8   4
///    2   4   8   4   2      (/42)
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 42,
    max_dy: 1,
    reach: 2,
};

/// Sierra dithering kernel, first two rows.
///
/// ```text
///            X   5   3
///    2   4   5   4   2      (/32)
/// ```
pub const SIERRA: Kernel = Kernel {
    entries: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
    max_dy: 1,
    reach: 2,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(kernel: &Kernel) -> u32 {
        kernel.entries.iter().map(|&(_, _, w)| w as u32).sum()
    }

    #[test]
    fn test_propagation_fractions() {
        assert_eq!(weight_sum(&FLOYD_STEINBERG), 16);
        assert_eq!(weight_sum(&JARVIS_JUDICE_NINKE), 48);
        assert_eq!(weight_sum(&STUCKI), 32);
        assert_eq!(weight_sum(&SIERRA), 25);
    }

    #[test]
    fn test_declared_extents_match_entries() {
        for kernel in [&FLOYD_STEINBERG, &JARVIS_JUDICE_NINKE, &STUCKI, &SIERRA] {
            let max_dy = kernel.entries.iter().map(|&(_, dy, _)| dy).max().unwrap();
            let reach = kernel.entries.iter().map(|&(dx, _, _)| dx.abs()).max().unwrap();
            assert_eq!(max_dy as usize, kernel.max_dy);
            assert_eq!(reach as usize, kernel.reach);
        }
    }

    #[test]
    fn test_row_depths() {
        assert_eq!(FLOYD_STEINBERG.rows(), 2);
        assert_eq!(SIERRA.rows(), 2);
        assert_eq!(STUCKI.rows(), 2);
        assert_eq!(JARVIS_JUDICE_NINKE.rows(), 3);
    }

    #[test]
    fn test_only_forward_targets() {
        for kernel in [&FLOYD_STEINBERG, &JARVIS_JUDICE_NINKE, &STUCKI, &SIERRA] {
            for &(dx, dy, _) in kernel.entries {
                assert!(dy > 0 || dx > 0, "({}, {}) is not ahead of X", dx, dy);
            }
        }
    }
}
