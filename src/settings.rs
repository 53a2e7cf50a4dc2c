//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound on/off (toggled with M)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Hit bursts
    pub particles: bool,
    /// Dotted aim preview
    pub trajectory_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            particles: true,
            trajectory_preview: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lobshot_settings";

    /// Parse stored JSON; unknown or missing fields take defaults
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Self = serde_json::from_str(json).ok()?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Some(settings)
    }

    /// Load settings from LocalStorage, defaults if absent or unreadable
    pub fn load() -> Self {
        match storage::get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
            }
            Ok(None) => log::info!("Using default settings"),
            Err(e) => log::debug!("{e}; using default settings"),
        }
        Self::default()
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        let Ok(json) = serde_json::to_string(self) else {
            return;
        };
        match storage::set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::debug!("{e}; settings not saved"),
        }
    }
}
