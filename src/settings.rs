//! Runtime tunables
//!
//! Ball speed, paddle width and palette size can change while the game runs
//! (range sliders in the browser, a JSON file for the native demo). The tick
//! reads them every frame instead of caching them.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_SPEED, PADDLE_WIDTH};
use crate::sim::palette::{DEFAULT_COLOR_COUNT, Palette};

/// Allowed ball speed (pixels per frame)
pub const BALL_SPEED_MIN: f32 = 1.0;
pub const BALL_SPEED_MAX: f32 = 20.0;

/// Allowed paddle width (pixels)
pub const PADDLE_WIDTH_MIN: f32 = 40.0;
pub const PADDLE_WIDTH_MAX: f32 = 300.0;

/// Error loading settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "invalid settings JSON: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Game tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball speed in pixels per frame
    pub ball_speed: f32,
    /// Paddle width in pixels
    pub paddle_width: f32,
    /// Number of palette colors in play
    pub color_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_speed: BALL_SPEED,
            paddle_width: PADDLE_WIDTH,
            color_count: DEFAULT_COLOR_COUNT,
        }
    }
}

impl Settings {
    pub fn set_ball_speed(&mut self, speed: f32) {
        self.ball_speed = clamp_or(speed, BALL_SPEED_MIN, BALL_SPEED_MAX, BALL_SPEED);
    }

    pub fn set_paddle_width(&mut self, width: f32) {
        self.paddle_width = clamp_or(width, PADDLE_WIDTH_MIN, PADDLE_WIDTH_MAX, PADDLE_WIDTH);
    }

    pub fn set_color_count(&mut self, count: usize) {
        self.color_count = count.clamp(1, Palette::CAPACITY);
    }

    /// Copy with every field pulled into its allowed range
    pub fn sanitized(&self) -> Self {
        let mut settings = self.clone();
        settings.set_ball_speed(self.ball_speed);
        settings.set_paddle_width(self.paddle_width);
        settings.set_color_count(self.color_count);
        settings
    }

    /// Parse settings from JSON. Missing fields take defaults; out-of-range
    /// values are clamped.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Clamp into `[min, max]`; NaN falls back to `default`
fn clamp_or(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_nan() {
        default
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ball_speed, 7.0);
        assert_eq!(settings.paddle_width, 100.0);
        assert_eq!(settings.color_count, 4);
    }

    #[test]
    fn test_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_ball_speed(100.0);
        assert_eq!(settings.ball_speed, BALL_SPEED_MAX);
        settings.set_ball_speed(f32::NAN);
        assert_eq!(settings.ball_speed, BALL_SPEED);
        settings.set_paddle_width(5.0);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH_MIN);
        settings.set_color_count(0);
        assert_eq!(settings.color_count, 1);
        settings.set_color_count(99);
        assert_eq!(settings.color_count, Palette::CAPACITY);
    }

    #[test]
    fn test_from_json_partial_and_clamped() {
        let settings = Settings::from_json(r#"{"ball_speed": 12, "color_count": 50}"#).unwrap();
        assert_eq!(settings.ball_speed, 12.0);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH);
        assert_eq!(settings.color_count, Palette::CAPACITY);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings JSON"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let mut settings = Settings::default();
        settings.set_paddle_width(180.0);
        let parsed = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(parsed, settings);
    }
}
