//! Palette entry type and color parsing
//!
//! [`PalEntry`] is the RGBA value stored in translation tables and unique
//! palettes. Colors written in translation clauses or palette files are parsed
//! with [`parse_color`], which accepts:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `hsl()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.

use std::fmt;

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// A single palette color.
///
/// The packed `u32` form ([`PalEntry::to_argb`]) puts alpha in the top byte,
/// then red, green and blue. Flag bytes stored in the alpha channel (see
/// [`crate::manipulation`]) rely on this layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PalEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PalEntry {
    /// Fully transparent black, the value of an unset slot.
    pub const TRANSPARENT: PalEntry = PalEntry { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: PalEntry = PalEntry { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: PalEntry = PalEntry { r: 255, g: 255, b: 255, a: 255 };

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha byte.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Unpack from `0xAARRGGBB`.
    pub const fn from_argb(v: u32) -> Self {
        Self { a: (v >> 24) as u8, r: (v >> 16) as u8, g: (v >> 8) as u8, b: v as u8 }
    }

    /// Bytes in `[r, g, b, a]` order, as hashed by the unique palette cache.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether the RGB channels match, ignoring alpha.
    pub fn same_rgb(self, other: PalEntry) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Perceptual intensity `77R + 143G + 37B`, in 1/256 units of 0..=255.
    pub const fn weighted_intensity(self) -> u32 {
        self.r as u32 * 77 + self.g as u32 * 143 + self.b as u32 * 37
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for PalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgba<u8>> for PalEntry {
    fn from(rgba: Rgba<u8>) -> Self {
        Self { r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] }
    }
}

impl From<PalEntry> for Rgba<u8> {
    fn from(pe: PalEntry) -> Self {
        Rgba([pe.r, pe.g, pe.b, pe.a])
    }
}

impl From<PalEntry> for String {
    fn from(pe: PalEntry) -> Self {
        pe.to_hex()
    }
}

impl TryFrom<String> for PalEntry {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if !s.starts_with('#') {
            return Err(ColorError::MissingHash);
        }
        parse_hex_color(&s).map(PalEntry::from)
    }
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use palremap::color::parse_color;
///
/// let red = parse_color("#F00").unwrap();
/// assert_eq!(red, image::Rgba([255, 0, 0, 255]));
///
/// let blue = parse_color("blue").unwrap();
/// assert_eq!(blue, image::Rgba([0, 0, 255, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    // Fast path for hex colors
    if s.starts_with('#') {
        return parse_hex_color(s);
    }

    parse_css_color(s)
}

/// Parse a hex color string (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let hex = &s[1..];

    let mut digits = Vec::with_capacity(hex.len());
    for c in hex.chars() {
        digits.push(parse_hex_digit(c)?);
    }

    match digits.as_slice() {
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let r = (rgb.r * 255.0).round() as u8;
                let g = (rgb.g * 255.0).round() as u8;
                let b = (rgb.b * 255.0).round() as u8;
                let a = (rgb.alpha * 255.0).round() as u8;
                Ok(Rgba([r, g, b, a]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}
