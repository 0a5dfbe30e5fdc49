//! Player preferences
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Shake on crash
    pub screen_shake: bool,
    /// Red flash on crash
    pub crash_flash: bool,
    /// Debris, coin sparkle and dust particles
    pub particles: bool,

    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Background music on/off
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Suspend audio while the page is hidden
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            crash_flash: true,
            particles: true,

            sound_enabled: true,
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.15,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective crash flash (respects reduced_motion)
    pub fn effective_crash_flash(&self) -> bool {
        self.crash_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
    }

    /// Effective sound effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective music gain (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "clear_ahead_settings";

    /// Parse stored settings, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Storage access denied, settings not saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_wins() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_crash_flash());
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 64);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_mute_toggles() {
        let mut settings = Settings::default();
        assert!(settings.effective_sfx_volume() > 0.0);
        settings.toggle_sound();
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        settings.toggle_music();
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"sound_enabled":false}"#);
        assert!(!settings.sound_enabled);
        assert!(settings.music_enabled);
        assert_eq!(settings.quality, QualityPreset::Medium);

        let garbage = Settings::from_json("not json");
        assert!(garbage.sound_enabled);
    }
}
