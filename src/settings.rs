//! Game settings and preferences
//!
//! Read once at startup from a JSON file. Missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ConversionBase;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "BINARY_QUEST_SETTINGS";
/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "binary_quest.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings file")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; `None` derives one from the clock
    pub seed: Option<u64>,
    /// Frame cap for the terminal loop
    pub fps_cap: u32,
    /// Base preselected in the conversion menu
    pub default_base: ConversionBase,

    // === Audio ===
    /// Terminal bell cues
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Shake the arena on wrong bits
    pub screen_shake: bool,
    /// Show the next expected bit in the HUD
    pub show_next_bit: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            fps_cap: 60,
            default_base: ConversionBase::Decimal,

            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            screen_shake: true,
            show_next_bit: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Frame cap clamped to a sane range
    pub fn effective_fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }

    /// Where settings are read from
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
