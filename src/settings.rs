//! Game settings and preferences
//!
//! Stored by the host; this module only knows the JSON shape.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::tuning::{Difficulty, GameMode};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty of the next round
    pub difficulty: Difficulty,
    /// Mode of the next round
    pub mode: GameMode,
    /// Sound volume (0.0 - 1.0)
    pub volume: f32,
    /// Show FPS counter
    pub show_fps: bool,
    /// Full-screen window
    pub full_screen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            mode: GameMode::Time,
            volume: 1.0,
            show_fps: false,
            full_screen: false,
        }
    }
}

impl Settings {
    /// Parse settings, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(SettingsError::NotAnObject);
        }
        let mut settings: Settings = serde_json::from_value(value)?;
        settings.volume = if settings.volume.is_finite() {
            settings.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse settings, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            mode: GameMode::Coins,
            volume: 0.4,
            show_fps: true,
            full_screen: false,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"mode":"Coins"}"#).unwrap();
        assert_eq!(settings.mode, GameMode::Coins);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_volume_clamped() {
        let settings = Settings::from_json(r#"{"volume":3.5}"#).unwrap();
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn test_corrupt_falls_back() {
        assert_eq!(Settings::load_or_default(Some("{not json")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
        assert!(Settings::from_json("{\"volume\":\"loud\"}").is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            Settings::from_json("[]"),
            Err(SettingsError::NotAnObject)
        ));
        assert!(matches!(
            Settings::from_json("42"),
            Err(SettingsError::NotAnObject)
        ));
        assert_eq!(Settings::load_or_default(Some("[]")), Settings::default());
    }
}
