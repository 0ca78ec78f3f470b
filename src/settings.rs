//! Game settings and preferences
//!
//! Persisted separately from the best score through the platform storage.

use serde::{Deserialize, Serialize};

use crate::platform::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off
    pub music_enabled: bool,
    /// Sound effects on/off
    pub sfx_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when the tab is hidden
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            mute_on_blur: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "algapuri_settings";

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
    }

    pub fn toggle_sfx(&mut self) {
        self.sfx_enabled = !self.sfx_enabled;
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Effective music volume (0 when disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective sfx volume (0 when disabled)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled {
            self.sfx_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {:#}", e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
