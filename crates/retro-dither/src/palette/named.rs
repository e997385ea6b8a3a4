//! Built-in palettes modeled on historical hardware.
//!
//! The set is closed: each [`NamedPalette`] resolves to a fixed list of
//! 8 to 64 colors. Custom palettes go through [`Palette::from_hex`].

use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use super::palette::Palette;
use super::rgb::Rgb;

const fn hex(v: u32) -> Rgb {
    Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Every combination of four channel levels, red-major.
const fn cube4(levels: [u8; 4]) -> [Rgb; 64] {
    let mut out = [Rgb::new(0, 0, 0); 64];
    let mut i = 0;
    while i < 64 {
        out[i] = Rgb::new(levels[i / 16], levels[(i / 4) % 4], levels[i % 4]);
        i += 1;
    }
    out
}

/// Every combination of three channel levels, red-major.
const fn cube3(levels: [u8; 3]) -> [Rgb; 27] {
    let mut out = [Rgb::new(0, 0, 0); 27];
    let mut i = 0;
    while i < 27 {
        out[i] = Rgb::new(levels[i / 9], levels[(i / 3) % 3], levels[i % 3]);
        i += 1;
    }
    out
}

/// IBM CGA 16-color RGBI palette (with the brown fix on index 6).
static CGA: [Rgb; 16] = [
    hex(0x000000),
    hex(0x0000AA),
    hex(0x00AA00),
    hex(0x00AAAA),
    hex(0xAA0000),
    hex(0xAA00AA),
    hex(0xAA5500),
    hex(0xAAAAAA),
    hex(0x555555),
    hex(0x5555FF),
    hex(0x55FF55),
    hex(0x55FFFF),
    hex(0xFF5555),
    hex(0xFF55FF),
    hex(0xFFFF55),
    hex(0xFFFFFF),
];

/// Commodore 64 VIC-II colors (Pepto's measurements).
static C64: [Rgb; 16] = [
    hex(0x000000),
    hex(0xFFFFFF),
    hex(0x68372B),
    hex(0x70A4B2),
    hex(0x6F3D86),
    hex(0x588D43),
    hex(0x352879),
    hex(0xB8C76F),
    hex(0x6F4F25),
    hex(0x433900),
    hex(0x9A6759),
    hex(0x444444),
    hex(0x6C6C6C),
    hex(0x9AD284),
    hex(0x6C5EB5),
    hex(0x959595),
];

/// Sinclair ZX Spectrum: 8 normal + 7 bright (bright black is black).
static ZX_SPECTRUM: [Rgb; 15] = [
    hex(0x000000),
    hex(0x0000D7),
    hex(0xD70000),
    hex(0xD700D7),
    hex(0x00D700),
    hex(0x00D7D7),
    hex(0xD7D700),
    hex(0xD7D7D7),
    hex(0x0000FF),
    hex(0xFF0000),
    hex(0xFF00FF),
    hex(0x00FF00),
    hex(0x00FFFF),
    hex(0xFFFF00),
    hex(0xFFFFFF),
];

static PICO_8: [Rgb; 16] = [
    hex(0x000000),
    hex(0x1D2B53),
    hex(0x7E2553),
    hex(0x008751),
    hex(0xAB5236),
    hex(0x5F574F),
    hex(0xC2C3C7),
    hex(0xFFF1E8),
    hex(0xFF004D),
    hex(0xFFA300),
    hex(0xFFEC27),
    hex(0x00E436),
    hex(0x29ADFF),
    hex(0x83769C),
    hex(0xFF77A8),
    hex(0xFFCCAA),
];

/// Apple II lo-res colors; the two identical greys collapse to one.
static APPLE_II: [Rgb; 15] = [
    hex(0x000000),
    hex(0x722640),
    hex(0x40337F),
    hex(0xE434FE),
    hex(0x0E5940),
    hex(0x808080),
    hex(0x1B9AFE),
    hex(0xBFB3FF),
    hex(0x404C00),
    hex(0xE46501),
    hex(0xF1A6BF),
    hex(0x1BCB01),
    hex(0xBFCC80),
    hex(0x8DD9BF),
    hex(0xFFFFFF),
];

/// TI TMS9918 as used by MSX1 (transparent entry dropped).
static MSX: [Rgb; 15] = [
    hex(0x000000),
    hex(0x3EB849),
    hex(0x74D07D),
    hex(0x5955E0),
    hex(0x8076F1),
    hex(0xB95E51),
    hex(0x65DBEF),
    hex(0xDB6559),
    hex(0xFF897D),
    hex(0xCCC35E),
    hex(0xDED087),
    hex(0x3AA241),
    hex(0xB766B5),
    hex(0xCCCCCC),
    hex(0xFFFFFF),
];

/// Amstrad CPC hardware palette: three levels per gun.
static AMSTRAD_CPC: [Rgb; 27] = cube3([0x00, 0x80, 0xFF]);

/// Classic Mac OS 4-bit system palette.
static MAC_16: [Rgb; 16] = [
    hex(0xFFFFFF),
    hex(0xFCF305),
    hex(0xFF6403),
    hex(0xDD0806),
    hex(0xF20884),
    hex(0x4600A5),
    hex(0x0000D4),
    hex(0x02ABEA),
    hex(0x1FB714),
    hex(0x006411),
    hex(0x562C05),
    hex(0x90713A),
    hex(0xC0C0C0),
    hex(0x808080),
    hex(0x404040),
    hex(0x000000),
];

/// 4x4x4 cube, the 6-bit RGB space of EGA/Master System era hardware.
static WEB_SAFE_64: [Rgb; 64] = cube4([0x00, 0x55, 0xAA, 0xFF]);

static GRAYSCALE_8: [Rgb; 8] = [
    hex(0x000000),
    hex(0x242424),
    hex(0x494949),
    hex(0x6D6D6D),
    hex(0x929292),
    hex(0xB6B6B6),
    hex(0xDBDBDB),
    hex(0xFFFFFF),
];

/// Built-in palette selection.
///
/// # Example
///
/// ```
/// use retro_dither::NamedPalette;
///
/// let named: NamedPalette = "c64".parse().unwrap();
/// assert_eq!(named, NamedPalette::C64);
/// assert_eq!(named.palette().len(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamedPalette {
    /// IBM CGA, 16 colors
    Cga,
    /// Commodore 64, 16 colors
    C64,
    /// Sinclair ZX Spectrum, 15 colors
    ZxSpectrum,
    /// PICO-8 fantasy console, 16 colors
    #[default]
    Pico8,
    /// Apple II lo-res, 15 colors
    AppleII,
    /// MSX1 / TMS9918, 15 colors
    Msx,
    /// Amstrad CPC, 27 colors
    AmstradCpc,
    /// Classic Mac OS 4-bit, 16 colors
    Mac16,
    /// 4 levels per channel, 64 colors
    WebSafe64,
    /// 8 evenly spaced greys
    Grayscale8,
}

impl NamedPalette {
    /// All built-in palettes, in listing order.
    pub const ALL: [NamedPalette; 10] = [
        NamedPalette::Cga,
        NamedPalette::C64,
        NamedPalette::ZxSpectrum,
        NamedPalette::Pico8,
        NamedPalette::AppleII,
        NamedPalette::Msx,
        NamedPalette::AmstradCpc,
        NamedPalette::Mac16,
        NamedPalette::WebSafe64,
        NamedPalette::Grayscale8,
    ];

    /// Kebab-case identifier, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            NamedPalette::Cga => "cga",
            NamedPalette::C64 => "c64",
            NamedPalette::ZxSpectrum => "zx-spectrum",
            NamedPalette::Pico8 => "pico-8",
            NamedPalette::AppleII => "apple-ii",
            NamedPalette::Msx => "msx",
            NamedPalette::AmstradCpc => "amstrad-cpc",
            NamedPalette::Mac16 => "mac-16",
            NamedPalette::WebSafe64 => "web-safe-64",
            NamedPalette::Grayscale8 => "grayscale-8",
        }
    }

    /// The raw color table.
    pub fn colors(self) -> &'static [Rgb] {
        match self {
            NamedPalette::Cga => &CGA,
            NamedPalette::C64 => &C64,
            NamedPalette::ZxSpectrum => &ZX_SPECTRUM,
            NamedPalette::Pico8 => &PICO_8,
            NamedPalette::AppleII => &APPLE_II,
            NamedPalette::Msx => &MSX,
            NamedPalette::AmstradCpc => &AMSTRAD_CPC,
            NamedPalette::Mac16 => &MAC_16,
            NamedPalette::WebSafe64 => &WEB_SAFE_64,
            NamedPalette::Grayscale8 => &GRAYSCALE_8,
        }
    }

    /// Resolve to a [`Palette`].
    pub fn palette(self) -> Palette {
        Palette::from_table(self.colors())
    }
}

impl fmt::Display for NamedPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedPalette {
    type Err = PaletteError;

    /// Case-insensitive; underscores are accepted in place of hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        NamedPalette::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| PaletteError::UnknownName(s.to_string()))
    }
}
