use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RGB color with channels in `0.0..=1.0`.
///
/// Serializes as a `0xRRGGBB` integer. Deserializes from an integer, a hex
/// string (`"0xffd1dc"`, `"#ffd1dc"`, `"ffd1dc"`) or an `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "u32")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#08x}", self.to_hex())
    }
}

/// Errors from parsing a color literal.
#[derive(Debug, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
    #[error("hex color {0:#x} exceeds 0xffffff")]
    OutOfRange(u32),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);
        let hex = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidHex(s.to_string()))?;
        Color::try_from(ColorRepr::Hex(hex))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Text(String),
    Channels([f32; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorParseError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) if hex > 0xff_ffff => Err(ColorParseError::OutOfRange(hex)),
            ColorRepr::Hex(hex) => Ok(Color::from_hex(hex)),
            ColorRepr::Text(text) => text.parse(),
            ColorRepr::Channels([r, g, b]) => Ok(Color::rgb(r, g, b)),
        }
    }
}
