#![forbid(unsafe_code)]

//! Typed display configuration derived from [`Settings`].

use std::fmt;

use crate::settings::Settings;

/// Setting names read by [`DisplayConfig::from_settings`].
pub mod keys {
    pub const DISPLAY_WIDTH: &str = "display_width";
    pub const DISPLAY_HEIGHT: &str = "display_height";
    pub const GLYPH_WIDTH: &str = "glyph_width";
    pub const GLYPH_HEIGHT: &str = "glyph_height";
    pub const GLYPH_MIRRORING: &str = "glyph_mirroring";
}

pub const DEFAULT_DISPLAY_WIDTH: u32 = 640;
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 480;
/// An 8x8 source glyph painted at scale 1.
pub const DEFAULT_GLYPH_CELL: u32 = 16;
/// Upper bound on any configured pixel dimension.
pub const MAX_DIMENSION: u32 = 16_384;

/// Where glyph rectangles are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphMirroring {
    /// Only the ring tile with index 0, in the unscrolled coordinate frame.
    #[default]
    Canonical,
    /// Every rectangle goes through the mirrored fill path, so glyphs stay
    /// correct across the scroll wrap boundary.
    Mirrored,
}

/// Display geometry for a scrollable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Character cell width in pixels.
    pub glyph_width: u32,
    /// Character cell height in pixels.
    pub glyph_height: u32,
    pub glyph_mirroring: GlyphMirroring,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            glyph_width: DEFAULT_GLYPH_CELL,
            glyph_height: DEFAULT_GLYPH_CELL,
            glyph_mirroring: GlyphMirroring::Canonical,
        }
    }
}

impl DisplayConfig {
    /// Config with the given surface size and default glyph settings.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Read the display settings, falling back to the documented defaults.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let config = Self {
            width: dimension(settings, keys::DISPLAY_WIDTH, DEFAULT_DISPLAY_WIDTH)?,
            height: dimension(settings, keys::DISPLAY_HEIGHT, DEFAULT_DISPLAY_HEIGHT)?,
            glyph_width: dimension(settings, keys::GLYPH_WIDTH, DEFAULT_GLYPH_CELL)?,
            glyph_height: dimension(settings, keys::GLYPH_HEIGHT, DEFAULT_GLYPH_CELL)?,
            glyph_mirroring: if settings.flag_or(keys::GLYPH_MIRRORING, false)? {
                GlyphMirroring::Mirrored
            } else {
                GlyphMirroring::Canonical
            },
        };
        Ok(config)
    }

    /// Write this config back into `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.set(keys::DISPLAY_WIDTH, self.width);
        settings.set(keys::DISPLAY_HEIGHT, self.height);
        settings.set(keys::GLYPH_WIDTH, self.glyph_width);
        settings.set(keys::GLYPH_HEIGHT, self.glyph_height);
        settings.set(
            keys::GLYPH_MIRRORING,
            self.glyph_mirroring == GlyphMirroring::Mirrored,
        );
    }

    /// Check every dimension is in `1..=MAX_DIMENSION`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (keys::DISPLAY_WIDTH, self.width),
            (keys::DISPLAY_HEIGHT, self.height),
            (keys::GLYPH_WIDTH, self.glyph_width),
            (keys::GLYPH_HEIGHT, self.glyph_height),
        ];
        for (name, value) in fields {
            if value == 0 || value > MAX_DIMENSION {
                return Err(ConfigError::InvalidDimension {
                    name,
                    value: f64::from(value),
                });
            }
        }
        Ok(())
    }
}

fn dimension(settings: &Settings, name: &'static str, default: u32) -> Result<u32, ConfigError> {
    let value = settings.number_or(name, f64::from(default))?;
    if value.fract() != 0.0 || value < 1.0 || value > f64::from(MAX_DIMENSION) {
        return Err(ConfigError::InvalidDimension { name, value });
    }
    Ok(value as u32)
}

/// Configuration failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A pixel dimension is zero, fractional, negative, or too large.
    InvalidDimension { name: &'static str, value: f64 },
    /// A setting exists but holds a different kind of value.
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Settings source could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { name, value } => {
                write!(f, "{name} must be a whole number in 1..={MAX_DIMENSION}, got {value}")
            }
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "setting {name} should be a {expected}, found a {found}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_settings_give_documented_defaults() {
        let config = DisplayConfig::from_settings(&Settings::new()).expect("defaults are valid");
        assert_eq!(config, DisplayConfig::default());
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.glyph_mirroring, GlyphMirroring::Canonical);
    }

    #[test]
    fn settings_override_defaults() {
        let mut settings = Settings::new();
        settings.set(keys::DISPLAY_WIDTH, 6u32);
        settings.set(keys::DISPLAY_HEIGHT, 6u32);
        settings.set(keys::GLYPH_MIRRORING, true);

        let config = DisplayConfig::from_settings(&settings).expect("valid");
        assert_eq!((config.width, config.height), (6, 6));
        assert_eq!(config.glyph_mirroring, GlyphMirroring::Mirrored);
    }

    #[test]
    fn bad_dimensions_fail_fast() {
        for value in [0.0, -5.0, 12.5, 1e9] {
            let mut settings = Settings::new();
            settings.set(keys::DISPLAY_HEIGHT, value);
            assert_eq!(
                DisplayConfig::from_settings(&settings),
                Err(ConfigError::InvalidDimension {
                    name: keys::DISPLAY_HEIGHT,
                    value
                })
            );
        }
    }

    #[test]
    fn apply_to_round_trips() {
        let config = DisplayConfig {
            width: 320,
            height: 200,
            glyph_width: 8,
            glyph_height: 8,
            glyph_mirroring: GlyphMirroring::Mirrored,
        };
        let mut settings = Settings::new();
        config.apply_to(&mut settings);
        assert_eq!(DisplayConfig::from_settings(&settings), Ok(config));
    }

    #[test]
    fn validate_rejects_zero_sized_surfaces() {
        assert!(DisplayConfig::default().validate().is_ok());
        assert!(DisplayConfig::with_size(0, 480).validate().is_err());
        assert!(DisplayConfig::with_size(640, MAX_DIMENSION + 1).validate().is_err());
    }
}
