#![forbid(unsafe_code)]

//! Named settings store.
//!
//! The host hands the display a flat bag of named values (numbers, strings,
//! flags). Typed views such as [`DisplayConfig`](crate::config::DisplayConfig)
//! are derived from it with explicit defaults; a value of the wrong type is an
//! error rather than a silent fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat, ordered settings map.
///
/// Serializes as a plain JSON object: `{"display_width": 320, "glyph_mirroring": true}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of settings.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Serialize back to a JSON object.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.values.insert(name.to_owned(), value.into())
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, name: &str) -> Option<SettingValue> {
        self.values.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate settings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Numeric setting, or `default` when unset.
    pub fn number_or(&self, name: &str, default: f64) -> Result<f64, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(SettingValue::Number(value)) => Ok(*value),
            Some(other) => Err(mismatch(name, "number", other)),
        }
    }

    /// Text setting, or `default` when unset.
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(SettingValue::Text(value)) => Ok(value),
            Some(other) => Err(mismatch(name, "text", other)),
        }
    }

    /// Flag setting, or `default` when unset.
    pub fn flag_or(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(SettingValue::Flag(value)) => Ok(*value),
            Some(other) => Err(mismatch(name, "flag", other)),
        }
    }
}

fn mismatch(name: &str, expected: &'static str, found: &SettingValue) -> ConfigError {
    ConfigError::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.type_name(),
    }
}
