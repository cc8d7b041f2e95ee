//! Parameter types for image operations.
//!
//! These structs describe *what* an operation should do. The pixel work lives
//! in [`operations`](super::operations); the pure math it relies on lives in
//! [`calculations`](super::calculations).
//!
//! ## Types
//!
//! - [`Color`]: 8-bit RGBA color, parsed from `#rrggbb` / `#rrggbbaa`.
//! - [`GradientDirection`]: axis a gradient background runs along.
//! - [`ShadowParams`]: offset, blur radius and color of a drop shadow.
//! - [`Percent`]: signed adjustment in `[-100, 100]`. Clamped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const TRANSPARENT_WHITE: Color = Color([255, 255, 255, 0]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba(self.0)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(format!("color '{s}' must be #rrggbb or #rrggbbaa"));
        }
        let mut channels = [255u8; 4];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|e| e.to_string())?;
            channels[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| format!("color '{s}' has invalid hex digits"))?;
        }
        Ok(Self(channels))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Axis a gradient background is interpolated along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Top row is the first color, bottom row approaches the second.
    #[default]
    Vertical,
    /// Left column is the first color, right column approaches the second.
    Horizontal,
}

/// Drop shadow parameters.
///
/// - `offset_x`, `offset_y`: shadow displacement in pixels (may be negative)
/// - `blur_radius`: Gaussian sigma applied to the silhouette (0 = hard edge)
/// - `color`: silhouette color; its alpha scales the source alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    pub offset_x: i32,
    pub offset_y: i32,
    pub blur_radius: f32,
    pub color: Color,
}

impl ShadowParams {
    /// Default shadow with the given blur radius.
    pub fn with_blur(blur_radius: f32) -> Self {
        Self {
            blur_radius,
            ..Self::default()
        }
    }
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            offset_x: 8,
            offset_y: 8,
            blur_radius: 15.0,
            color: Color::rgba(0, 0, 0, 180),
        }
    }
}

/// Signed enhancement percentage in `[-100, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Percent(i32);

impl Percent {
    pub fn new(value: i32) -> Self {
        Self(value.clamp(-100, 100))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiplicative enhancement factor `1 + p/100`, never negative.
    pub fn factor(self) -> f32 {
        (1.0 + self.0 as f32 / 100.0).max(0.0)
    }
}
