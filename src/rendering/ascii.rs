//! ASCII cell grid: a converter that samples a frame into glyph cells and a
//! renderer that composites the grid onto a pixmap.
//!
//! Glyph rasterization is not done here. [`BlockAsciiRenderer`] draws each
//! cell as a centered block whose area follows the glyph's position on the
//! charset ramp, which keeps the output font-free and deterministic.

use retro_dither::{Framebuffer, Rgb};
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use crate::models::{AsciiColorMode, AsciiStyle};

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiCell {
    pub glyph: char,
    /// Position of `glyph` on the charset ramp, 0 (sparsest) to 1 (densest)
    pub density: f32,
    pub color: Rgb,
}

/// Row-major grid of cells produced by an [`AsciiConverter`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    pub columns: usize,
    pub rows: usize,
    pub cells: Vec<AsciiCell>,
}

impl CellGrid {
    pub fn cell(&self, column: usize, row: usize) -> &AsciiCell {
        &self.cells[row * self.columns + column]
    }

    /// Rows of glyphs joined by newlines.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter().map(|c| c.glyph));
            out.push('\n');
        }
        out
    }
}

pub trait AsciiConverter: Send {
    fn convert(&self, frame: &Framebuffer, style: &AsciiStyle) -> CellGrid;
}

pub trait AsciiRenderer: Send {
    /// Paint `grid` over the whole of `target`.
    fn render(&self, grid: &CellGrid, target: &mut Pixmap, style: &AsciiStyle);
}

/// Parse a style color, falling back when the string is not valid hex.
pub fn style_color(value: &str, fallback: Rgb) -> Rgb {
    value.parse().unwrap_or(fallback)
}

const FALLBACK_CHARSET: &str = " .:-=+*#%@";

/// Maps mean cell luma onto the charset ramp.
#[derive(Debug, Default, Clone, Copy)]
pub struct LumaAsciiConverter;

impl LumaAsciiConverter {
    /// Luma in [0, 1] after contrast, gamma and inversion.
    fn shape(luma: f32, style: &AsciiStyle) -> f32 {
        let mut l = ((luma - 0.5) * style.contrast + 0.5).clamp(0.0, 1.0);
        if style.gamma > 0.0 && style.gamma.is_finite() {
            l = l.powf(1.0 / style.gamma);
        }
        if style.invert {
            l = 1.0 - l;
        }
        l
    }
}

impl AsciiConverter for LumaAsciiConverter {
    fn convert(&self, frame: &Framebuffer, style: &AsciiStyle) -> CellGrid {
        let ramp: Vec<char> = if style.charset.is_empty() {
            FALLBACK_CHARSET.chars().collect()
        } else {
            style.charset.chars().collect()
        };
        let steps = (ramp.len() - 1).max(1) as f32;
        let cell = style.resolution.max(1) as usize;
        let text_color = style_color(&style.text_color, Rgb::new(255, 255, 255));

        let (width, height) = (frame.width(), frame.height());
        let columns = width.div_ceil(cell);
        let rows = height.div_ceil(cell);
        let mut cells = Vec::with_capacity(columns * rows);

        for row in 0..rows {
            let y0 = row * cell;
            let y1 = (y0 + cell).min(height);
            for column in 0..columns {
                let x0 = column * cell;
                let x1 = (x0 + cell).min(width);

                let mut sum = [0u32; 3];
                for y in y0..y1 {
                    for x in x0..x1 {
                        let [r, g, b, _] = frame.pixel(x, y);
                        sum[0] += u32::from(r);
                        sum[1] += u32::from(g);
                        sum[2] += u32::from(b);
                    }
                }
                let n = ((x1 - x0) * (y1 - y0)) as u32;
                let mean = [sum[0] / n, sum[1] / n, sum[2] / n];
                let luma = (0.299 * mean[0] as f32 + 0.587 * mean[1] as f32 + 0.114 * mean[2] as f32)
                    / 255.0;

                let level = Self::shape(luma, style);
                let index = ((level * steps).round() as usize).min(ramp.len() - 1);
                let color = match style.color_mode {
                    AsciiColorMode::Mono => text_color,
                    AsciiColorMode::Source => Rgb::new(mean[0] as u8, mean[1] as u8, mean[2] as u8),
                };

                cells.push(AsciiCell {
                    glyph: ramp[index],
                    density: index as f32 / steps,
                    color,
                });
            }
        }

        CellGrid {
            columns,
            rows,
            cells,
        }
    }
}

/// Draws each cell as a filled block sized by glyph density.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockAsciiRenderer;

impl BlockAsciiRenderer {
    /// Ink coverage multiplier for a CSS-style font weight.
    fn weight_factor(weight: u16) -> f32 {
        0.55 + 0.45 * (f32::from(weight.clamp(100, 900)) - 100.0) / 800.0
    }
}

impl AsciiRenderer for BlockAsciiRenderer {
    fn render(&self, grid: &CellGrid, target: &mut Pixmap, style: &AsciiStyle) {
        let bg = style_color(&style.background_color, Rgb::new(0, 0, 0));
        target.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        if grid.columns == 0 || grid.rows == 0 {
            return;
        }

        let pitch_x = target.width() as f32 / grid.columns as f32;
        let pitch_y = target.height() as f32 / grid.rows as f32;
        let glyph_h = if style.font_size > 0.0 {
            style.font_size.min(pitch_y)
        } else {
            pitch_y
        };
        let glyph_w = pitch_x.min(glyph_h);
        let weight = Self::weight_factor(style.font_weight);
        let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

        let mut paint = Paint::default();
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let cell = grid.cell(column, row);
                let coverage = (cell.density * weight).sqrt();
                if coverage <= 0.0 {
                    continue;
                }
                let w = glyph_w * coverage;
                let h = glyph_h * coverage;
                let x = column as f32 * pitch_x + (pitch_x - w) * 0.5;
                let y = row as f32 * pitch_y + (pitch_y - h) * 0.5;

                paint.set_color_rgba8(cell.color.r, cell.color.g, cell.color.b, alpha);
                if let Some(rect) = Rect::from_xywh(x, y, w, h) {
                    target.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }
}
