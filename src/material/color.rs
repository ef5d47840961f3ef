//! Normalized colors.
//!
//! Channels are stored in `[0, 1]`. The 8-bit constructors divide by 255
//! exactly once; nothing downstream rescales a stored color.

use serde::{Deserialize, Serialize};

/// RGB color with normalized channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorRepr")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// From already-normalized channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels (0-255).
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    pub fn to_f32_array(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// RGB plus alpha.
///
/// Alpha is accepted and carried but no record consumes it yet; converting to
/// [`Rgb`] drops it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// From 8-bit color channels and an alpha already in `[0, 1]`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: f64) -> Self {
        let Rgb { r, g, b } = Rgb::from_u8(r, g, b);
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        c.rgb()
    }
}

/// Accepted JSON spellings of a color.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    /// `[r, g, b]` in 0-255
    Bytes([u8; 3]),
    /// `{ "r": .., "g": .., "b": .. }` already normalized
    Normalized { r: f64, g: f64, b: f64 },
}

impl From<ColorRepr> for Rgb {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Bytes([r, g, b]) => Rgb::from_u8(r, g, b),
            ColorRepr::Normalized { r, g, b } => Rgb::new(r, g, b),
        }
    }
}
