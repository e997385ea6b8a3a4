//! Per-frame compositing: crop and scale the captured source into the
//! export surface and run the configured effect chain on the way.

use retro_dither::scale::upsample_nearest_rgb;
use retro_dither::{Framebuffer, RetroDitherer, Rgb};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use super::crop::CropRect;
use crate::error::ExportError;
use crate::models::{AsciiStyle, EffectMode, EffectSettings};
use crate::rendering::{
    pixmap_to_frame, AsciiConverter, AsciiRenderer, BlockAsciiRenderer,
    LumaAsciiConverter,
};

/// The effect applied between capture and encode.
pub enum EffectChain {
    Passthrough,
    Dither(RetroDitherer),
    Ascii {
        style: AsciiStyle,
        converter: Box<dyn AsciiConverter>,
        renderer: Box<dyn AsciiRenderer>,
    },
}

impl EffectChain {
    /// Build the chain for `settings`, with a fresh quantizer cache.
    pub fn from_settings(settings: &EffectSettings) -> Result<Self, ExportError> {
        match settings.mode {
            EffectMode::None => Ok(EffectChain::Passthrough),
            EffectMode::Dither => Ok(EffectChain::Dither(settings.ditherer()?)),
            EffectMode::Ascii => {
                let style = &settings.ascii;
                for (field, value) in [
                    ("text_color", &style.text_color),
                    ("background_color", &style.background_color),
                ] {
                    if value.parse::<Rgb>().is_err() {
                        return Err(ExportError::InvalidSettings(format!(
                            "ascii {field} '{value}' is not a hex color"
                        )));
                    }
                }
                Ok(EffectChain::Ascii {
                    style: style.clone(),
                    converter: Box::new(LumaAsciiConverter),
                    renderer: Box::new(BlockAsciiRenderer),
                })
            }
        }
    }

    pub fn mode(&self) -> EffectMode {
        match self {
            EffectChain::Passthrough => EffectMode::None,
            EffectChain::Dither(_) => EffectMode::Dither,
            EffectChain::Ascii { .. } => EffectMode::Ascii,
        }
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectChain::Passthrough => f.write_str("Passthrough"),
            EffectChain::Dither(d) => f
                .debug_struct("Dither")
                .field("algorithm", &d.selected_algorithm())
                .field("colors", &d.palette().len())
                .finish(),
            EffectChain::Ascii { style, .. } => {
                f.debug_struct("Ascii").field("style", style).finish()
            }
        }
    }
}

/// Scratch surface size for an export size and scale factor.
pub fn scratch_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let scale = if scale > 0.0 && scale <= 1.0 { scale } else { 1.0 };
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}

/// Owns the export and scratch surfaces for one job.
pub struct FrameCompositor {
    crop: CropRect,
    source_size: (u32, u32),
    export: Pixmap,
    /// Reduced-size surface the dither chain runs on
    scratch: Pixmap,
    chain: EffectChain,
}

impl std::fmt::Debug for FrameCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCompositor")
            .field("crop", &self.crop)
            .field("source_size", &self.source_size)
            .field("output_size", &self.output_size())
            .field("scratch_size", &(self.scratch.width(), self.scratch.height()))
            .field("chain", &self.chain)
            .finish()
    }
}

impl FrameCompositor {
    pub fn new(
        source_size: (u32, u32),
        width: u32,
        height: u32,
        scratch_scale: f32,
        chain: EffectChain,
    ) -> Result<Self, ExportError> {
        let (sw, sh) = source_size;
        if sw == 0 || sh == 0 {
            return Err(ExportError::SurfaceAllocation {
                width: sw,
                height: sh,
            });
        }
        let export =
            Pixmap::new(width, height).ok_or(ExportError::SurfaceAllocation { width, height })?;

        let (w, h) = scratch_dimensions(width, height, scratch_scale);
        let scratch = Pixmap::new(w, h).ok_or(ExportError::SurfaceAllocation {
            width: w,
            height: h,
        })?;

        Ok(Self {
            crop: CropRect::fit(sw, sh, width, height),
            source_size,
            export,
            scratch,
            chain,
        })
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn output_size(&self) -> (u32, u32) {
        (self.export.width(), self.export.height())
    }

    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    /// Produce one finished export frame from a captured source pixmap.
    pub fn compose(&mut self, source: &Pixmap) -> Result<Framebuffer, ExportError> {
        let size = (source.width(), source.height());
        if size != self.source_size {
            tracing::debug!(?size, previous = ?self.source_size, "Source size changed, refitting crop");
            self.source_size = size;
            let (w, h) = self.output_size();
            self.crop = CropRect::fit(size.0, size.1, w, h);
        }

        match &mut self.chain {
            EffectChain::Passthrough => {
                draw_cropped(&mut self.export, source, self.crop, FilterQuality::Bilinear);
                Ok(pixmap_to_frame(&self.export)?)
            }
            EffectChain::Dither(ditherer) => {
                draw_cropped(&mut self.scratch, source, self.crop, FilterQuality::Bilinear);
                let mut small = pixmap_to_frame(&self.scratch)?;
                ditherer.process(&mut small);

                // alpha comes from the export-size crop; RGB stays in straight
                // alpha so every pixel remains an exact palette member
                draw_cropped(&mut self.export, source, self.crop, FilterQuality::Bilinear);
                let mut frame = pixmap_to_frame(&self.export)?;
                upsample_nearest_rgb(&small, &mut frame);
                Ok(frame)
            }
            EffectChain::Ascii {
                style,
                converter,
                renderer,
            } => {
                draw_cropped(&mut self.export, source, self.crop, FilterQuality::Bilinear);
                let frame = pixmap_to_frame(&self.export)?;
                let grid = converter.convert(&frame, style);
                renderer.render(&grid, &mut self.export, style);
                Ok(pixmap_to_frame(&self.export)?)
            }
        }
    }
}

/// Draw the `crop` region of `source` scaled to fill `target`.
fn draw_cropped(target: &mut Pixmap, source: &Pixmap, crop: CropRect, quality: FilterQuality) {
    let (sx, sy) = crop.scale_to(target.width(), target.height());
    target.fill(tiny_skia::Color::TRANSPARENT);
    target.draw_pixmap(
        -(crop.x as i32),
        -(crop.y as i32),
        source.as_ref(),
        &PixmapPaint {
            quality,
            ..Default::default()
        },
        Transform::from_scale(sx, sy),
        None,
    );
}
