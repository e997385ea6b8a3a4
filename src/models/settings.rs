//! Effect and export settings shared by the config file, the HTTP API and
//! the CLI.

use retro_dither::{DitherAlgorithm, DitherError, NamedPalette, Palette, RetroDitherer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::error::ExportError;

/// Which post-processing stage runs on captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EffectMode {
    /// Crop and scale only
    None,
    /// Pixelation, palette reduction and dithering
    #[default]
    Dither,
    /// ASCII cell grid
    Ascii,
}

/// Where ASCII glyph colors come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AsciiColorMode {
    /// Every glyph uses `text_color`
    #[default]
    Mono,
    /// Every glyph uses the average color of its cell
    Source,
}

/// Options passed to the ASCII converter and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AsciiStyle {
    /// Glyph ramp from darkest to brightest
    pub charset: String,
    /// Cell size in source pixels
    pub resolution: u32,
    pub invert: bool,
    pub contrast: f32,
    pub gamma: f32,
    pub color_mode: AsciiColorMode,
    pub text_color: String,
    pub background_color: String,
    /// Glyph height in output pixels; the cell pitch on the export surface
    pub font_size: f32,
    /// 100-900; heavier weights fill more of each cell
    pub font_weight: u16,
    pub opacity: f32,
}

impl Default for AsciiStyle {
    fn default() -> Self {
        Self {
            charset: " .:-=+*#%@".to_string(),
            resolution: 8,
            invert: false,
            contrast: 1.0,
            gamma: 1.0,
            color_mode: AsciiColorMode::Mono,
            text_color: "#33ff66".to_string(),
            background_color: "#000000".to_string(),
            font_size: 8.0,
            font_weight: 400,
            opacity: 1.0,
        }
    }
}

/// The effect stack applied to every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EffectSettings {
    pub mode: EffectMode,
    /// Named palette, see `retroloop palettes`
    pub palette: String,
    /// Custom palette as hex colors; overrides `palette` when set
    pub colors: Option<Vec<String>>,
    pub algorithm: String,
    /// Dither strength, 0-1
    pub intensity: f32,
    /// Working resolution for dithering, 0.05-1
    pub resolution: f32,
    /// Pixelation block size on the scratch surface; 1 disables
    pub pixel_size: u32,
    pub ascii: AsciiStyle,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            mode: EffectMode::Dither,
            palette: NamedPalette::default().name().to_string(),
            colors: None,
            algorithm: DitherAlgorithm::default().name().to_string(),
            intensity: 1.0,
            resolution: 1.0,
            pixel_size: 1,
            ascii: AsciiStyle::default(),
        }
    }
}

impl EffectSettings {
    /// Resolve the active palette: custom colors first, then the named one.
    pub fn resolve_palette(&self) -> Result<Palette, DitherError> {
        match &self.colors {
            Some(colors) => {
                let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
                Ok(Palette::from_hex(&refs)?)
            }
            None => Ok(self.palette.parse::<NamedPalette>()?.palette()),
        }
    }

    pub fn resolve_algorithm(&self) -> Result<DitherAlgorithm, DitherError> {
        Ok(self.algorithm.parse()?)
    }

    /// Build a fresh ditherer (with an empty cache) for these settings.
    pub fn ditherer(&self) -> Result<RetroDitherer, DitherError> {
        Ok(RetroDitherer::new(self.resolve_palette()?)
            .algorithm(self.resolve_algorithm()?)
            .intensity(self.intensity)
            .resolution(self.resolution)
            .pixel_size(self.pixel_size as usize))
    }
}

/// Partial effect settings layered over the configured ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EffectOverrides {
    pub mode: Option<EffectMode>,
    pub palette: Option<String>,
    pub colors: Option<Vec<String>>,
    pub algorithm: Option<String>,
    pub intensity: Option<f32>,
    pub resolution: Option<f32>,
    pub pixel_size: Option<u32>,
}

impl EffectOverrides {
    pub fn apply(&self, settings: &mut EffectSettings) {
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(palette) = &self.palette {
            settings.palette = palette.clone();
            // a named palette request replaces any configured custom colors
            settings.colors = None;
        }
        if let Some(colors) = &self.colors {
            settings.colors = Some(colors.clone());
        }
        if let Some(algorithm) = &self.algorithm {
            settings.algorithm = algorithm.clone();
        }
        if let Some(intensity) = self.intensity {
            settings.intensity = intensity;
        }
        if let Some(resolution) = self.resolution {
            settings.resolution = resolution;
        }
        if let Some(pixel_size) = self.pixel_size {
            settings.pixel_size = pixel_size;
        }
    }
}

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Webm,
    Gif,
    /// Numbered PNG files in a directory
    Png,
}

impl ExportFormat {
    pub fn is_video(self) -> bool {
        matches!(self, ExportFormat::Mp4 | ExportFormat::Webm)
    }

    /// File extension, or `None` for the PNG sequence directory.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ExportFormat::Mp4 => Some("mp4"),
            ExportFormat::Webm => Some("webm"),
            ExportFormat::Gif => Some("gif"),
            ExportFormat::Png => None,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(ExportFormat::Mp4),
            "webm" => Ok(ExportFormat::Webm),
            "gif" => Ok(ExportFormat::Gif),
            "png" | "png-sequence" => Ok(ExportFormat::Png),
            other => Err(format!("unknown export format '{other}' (mp4, webm, gif, png)")),
        }
    }
}

/// Video bitrate preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Good,
    #[default]
    Excellent,
    Maximum,
}

impl Quality {
    /// Bits per pixel per frame.
    pub fn multiplier(self) -> f64 {
        match self {
            Quality::Good => 0.6,
            Quality::Excellent => 1.5,
            Quality::Maximum => 3.0,
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "good" => Ok(Quality::Good),
            "excellent" => Ok(Quality::Excellent),
            "maximum" | "max" => Ok(Quality::Maximum),
            other => Err(format!("unknown quality '{other}' (good, excellent, maximum)")),
        }
    }
}

/// Timing, size and container of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExportSettings {
    /// Length of one loop of the scene, in seconds
    pub loop_duration: f64,
    pub loop_count: u32,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub quality: Quality,
    /// Scratch surface size relative to the export size for dither effects
    pub scratch_scale: f32,
    /// Output file (or directory for PNG sequences)
    #[schema(value_type = String)]
    pub output: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            loop_duration: 4.0,
            loop_count: 1,
            fps: 30,
            width: 1080,
            height: 1080,
            format: ExportFormat::Mp4,
            quality: Quality::Excellent,
            scratch_scale: 0.5,
            output: PathBuf::from("retroloop"),
        }
    }
}

impl ExportSettings {
    /// Output path with the format's extension added when it has none.
    pub fn resolved_output(&self) -> PathBuf {
        match self.format.extension() {
            Some(ext) if self.output.extension().is_none() => self.output.with_extension(ext),
            _ => self.output.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::InvalidSettings(format!(
                "export size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ExportError::InvalidSettings("fps must be non-zero".into()));
        }
        if self.loop_count == 0 {
            return Err(ExportError::InvalidSettings(
                "loop_count must be at least 1".into(),
            ));
        }
        if !(self.loop_duration.is_finite() && self.loop_duration > 0.0) {
            return Err(ExportError::InvalidSettings(
                "loop_duration must be a positive number of seconds".into(),
            ));
        }
        if !(self.scratch_scale > 0.0 && self.scratch_scale <= 1.0) {
            return Err(ExportError::InvalidSettings(
                "scratch_scale must be in (0, 1]".into(),
            ));
        }
        if self.format == ExportFormat::Mp4
            && (self.width % 2 != 0 || self.height % 2 != 0)
        {
            return Err(ExportError::InvalidSettings(
                "mp4 export needs even width and height (yuv420p)".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_effects_resolve() {
        let effects = EffectSettings::default();
        assert_eq!(effects.resolve_palette().unwrap().len(), 16);
        assert_eq!(
            effects.resolve_algorithm().unwrap(),
            DitherAlgorithm::FloydSteinberg
        );
        assert!(effects.ditherer().is_ok());
    }

    #[test]
    fn test_custom_colors_win_over_named_palette() {
        let effects = EffectSettings {
            colors: Some(vec!["#000".into(), "#fff".into()]),
            ..Default::default()
        };
        assert_eq!(effects.resolve_palette().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_palette_is_an_error() {
        let effects = EffectSettings {
            palette: "vga".into(),
            ..Default::default()
        };
        assert!(matches!(
            effects.resolve_palette(),
            Err(DitherError::Palette(_))
        ));
    }

    #[test]
    fn test_overrides_apply() {
        let mut effects = EffectSettings {
            colors: Some(vec!["#000".into(), "#fff".into()]),
            ..Default::default()
        };
        EffectOverrides {
            palette: Some("c64".into()),
            intensity: Some(0.25),
            mode: Some(EffectMode::Ascii),
            ..Default::default()
        }
        .apply(&mut effects);

        assert_eq!(effects.palette, "c64");
        assert_eq!(effects.colors, None);
        assert_eq!(effects.intensity, 0.25);
        assert_eq!(effects.mode, EffectMode::Ascii);
        assert_eq!(effects.algorithm, "floyd-steinberg");
    }

    #[test]
    fn test_export_settings_validation() {
        assert!(ExportSettings::default().validate().is_ok());

        let odd = ExportSettings {
            width: 101,
            ..Default::default()
        };
        assert!(odd.validate().is_err());
        let odd_png = ExportSettings {
            width: 101,
            format: ExportFormat::Png,
            ..Default::default()
        };
        assert!(odd_png.validate().is_ok());

        let zero_fps = ExportSettings {
            fps: 0,
            ..Default::default()
        };
        assert!(zero_fps.validate().is_err());

        let bad_scale = ExportSettings {
            scratch_scale: 0.0,
            ..Default::default()
        };
        assert!(bad_scale.validate().is_err());
    }

    #[test]
    fn test_resolved_output_extension() {
        let mut settings = ExportSettings {
            output: PathBuf::from("out/loop"),
            format: ExportFormat::Webm,
            ..Default::default()
        };
        assert_eq!(settings.resolved_output(), PathBuf::from("out/loop.webm"));

        settings.format = ExportFormat::Png;
        assert_eq!(settings.resolved_output(), PathBuf::from("out/loop"));

        settings.output = PathBuf::from("clip.mov");
        settings.format = ExportFormat::Mp4;
        assert_eq!(settings.resolved_output(), PathBuf::from("clip.mov"));
    }

    #[test]
    fn test_format_and_quality_parse() {
        assert_eq!("GIF".parse::<ExportFormat>().unwrap(), ExportFormat::Gif);
        assert_eq!("png-sequence".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert!("avi".parse::<ExportFormat>().is_err());
        assert_eq!("max".parse::<Quality>().unwrap(), Quality::Maximum);
    }

    #[test]
    fn test_yaml_snake_case() {
        let effects: EffectSettings =
            serde_yaml::from_str("mode: ascii\npalette: zx-spectrum\n").unwrap();
        assert_eq!(effects.mode, EffectMode::Ascii);
        assert_eq!(effects.palette, "zx-spectrum");
        assert_eq!(effects.intensity, 1.0);
    }
}
