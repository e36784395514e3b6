//! Game settings and preferences
//!
//! Persisted as `settings.json` in the data directory; missing fields take
//! their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, StoreError};

/// File name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

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
    /// Silence everything
    pub muted: bool,

    // === Session ===
    /// Fixed RNG seed; a fresh one per launch when absent
    pub seed: Option<u64>,
    /// Begin with the hitbox overlay on (and collisions off)
    pub start_with_debug: bool,
    /// Let the built-in autopilot play
    pub autopilot: bool,
    /// Stop after this many ticks (headless runs)
    pub max_ticks: Option<u64>,
    /// Where high scores live; `DINO_DASH_DATA_DIR` wins over this
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            // Session
            seed: None,
            start_with_debug: false,
            autopilot: true,
            max_ticks: None,
            data_dir: None,
        }
    }
}

impl Settings {
    /// Effective sound effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music volume (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether any audio should play at all
    pub fn audio_enabled(&self) -> bool {
        self.effective_sfx_volume() > 0.0 || self.effective_music_volume() > 0.0
    }

    /// Load settings from `dir`, defaults when missing or malformed
    pub fn load(dir: &Path) -> Self {
        persistence::load_or_default(&dir.join(SETTINGS_FILE))
    }

    /// Save settings to `dir`
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        persistence::save_json(&dir.join(SETTINGS_FILE), self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
