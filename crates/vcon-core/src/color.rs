#![forbid(unsafe_code)]

//! Packed RGBA colours and CSS hex parsing.
//!
//! Fill styles arrive from the host as CSS colour strings (`"#ff00ff"`), while
//! the software surfaces store one packed `u32` per pixel.

use std::fmt;
use std::str::FromStr;

/// A colour packed as `0xRRGGBBAA` (straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB colour (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA colour with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether a pixel of this colour is visible at all.
    #[inline]
    pub const fn is_visible(self) -> bool {
        self.a() != 0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_css_hex(text: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::Invalid(text.to_owned());
        let digits = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            3 => {
                let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                Ok(Self::rgb(
                    expand(value >> 8),
                    expand(value >> 4),
                    expand(value),
                ))
            }
            6 => Ok(Self((value << 8) | 0xFF)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }

    /// CSS representation: `#rrggbb` when opaque, `rgba(...)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            let alpha = f64::from(self.a()) / 255.0;
            format!(
                "rgba({}, {}, {}, {alpha:.3})",
                self.r(),
                self.g(),
                self.b()
            )
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_css_hex(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Colour parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not a `#rgb` / `#rrggbb` / `#rrggbbaa` string.
    Invalid(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(text) => write!(f, "invalid colour {text:?}"),
        }
    }
}

impl std::error::Error for ColorError {}
