//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

/// A raw RGBA pixel as stored in a surface buffer.
pub type Rgba = [u8; 4];

/// An RGBA colour value.
///
/// Serialises as a hex string so it can be written directly in
/// `stickerkit.yaml` (e.g. `stroke: { colour: "#FFFFFF" }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Saturated green, the key colour sheets are generated against.
    pub const KEY_GREEN: Self = Self::rgb(0, 255, 0);

    pub const fn from_rgba(px: Rgba) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    pub const fn to_rgba(self) -> Rgba {
        [self.r, self.g, self.b, self.a]
    }

    /// How far green rises above the stronger of red and blue.
    ///
    /// Negative for pixels that are not green-dominant.
    pub fn green_excess(self) -> i32 {
        self.g as i32 - self.r.max(self.b) as i32
    }

    /// Parse a hex colour string: `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid_hex(s));

        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                    let d = c.to_digit(16).ok_or_else(|| invalid_hex(s))? as u8;
                    *slot = d << 4 | d;
                }
                Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid_hex(s)),
        }
    }
}

fn invalid_hex(s: &str) -> StickerError {
    StickerError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB, #RRGGBB, or #RRGGBBAA format".to_string()),
    }
}

impl From<Rgba> for Colour {
    fn from(px: Rgba) -> Self {
        Self::from_rgba(px)
    }
}

impl FromStr for Colour {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = StickerError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
