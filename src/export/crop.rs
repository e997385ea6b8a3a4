//! Center-crop of the source surface to the export aspect ratio.

/// Source rectangle that fills the export frame without letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Largest centered source region with the output's aspect ratio.
    ///
    /// An output wider than the source (relative to aspect) keeps the full
    /// source width and crops height; otherwise the full height is kept and
    /// the width is cropped.
    pub fn fit(src_width: u32, src_height: u32, out_width: u32, out_height: u32) -> Self {
        let src_aspect = f64::from(src_width) / f64::from(src_height);
        let out_aspect = f64::from(out_width) / f64::from(out_height);

        let (width, height) = if out_aspect > src_aspect {
            let h = (f64::from(src_width) / out_aspect).round() as u32;
            (src_width, h.clamp(1, src_height))
        } else {
            let w = (f64::from(src_height) * out_aspect).round() as u32;
            (w.clamp(1, src_width), src_height)
        };

        Self {
            x: (src_width - width) / 2,
            y: (src_height - height) / 2,
            width,
            height,
        }
    }

    /// Scale factors mapping this rectangle onto a `w`x`h` target.
    pub fn scale_to(&self, w: u32, h: u32) -> (f32, f32) {
        (
            w as f32 / self.width as f32,
            h as f32 / self.height as f32,
        )
    }
}
