//! Game settings and preferences
//!
//! Persisted as JSON next to the level assets, separately from any save
//! data. Loading is forgiving: a missing or unreadable file just yields the
//! defaults, so a fresh install works with no settings file at all.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when the window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (minimize flashes and shakes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults on any
    /// failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.as_ref().display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file is malformed ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Write settings back out as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Effective sfx volume after the master level
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music volume after the master level
    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let loaded = Settings::load("/nonexistent/brickfall_settings.json");
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = std::env::temp_dir().join("brickfall_settings_test.json");
        let mut settings = Settings::default();
        settings.master_volume = 0.5;
        settings.show_fps = true;

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"music_volume": 0.2}"#).unwrap();
        assert!((loaded.music_volume - 0.2).abs() < f32::EPSILON);
        assert_eq!(loaded.sfx_volume, Settings::default().sfx_volume);
    }

    #[test]
    fn test_effective_volumes() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.8,
            music_volume: 1.0,
            ..Settings::default()
        };
        assert!((settings.effective_sfx_volume() - 0.4).abs() < 0.001);
        assert!((settings.effective_music_volume() - 0.5).abs() < 0.001);
    }
}
