//! Game configuration (window, look sensitivity, clue service, audio). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Mouse look multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub mouse_sensitivity: f32,
    /// Touch-drag look multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub touch_sensitivity: f32,
    /// Fixed case seed. `None` picks a fresh one per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// External clue writer: program and arguments. Gets the prompt on stdin,
    /// answers with a JSON array of strings on stdout.
    #[serde(default)]
    pub clue_command: Option<Vec<String>>,
    /// Give up on the clue writer after this many seconds.
    #[serde(default = "default_clue_timeout_secs")]
    pub clue_timeout_secs: f32,
    /// Directory holding `<cue>.ogg` files.
    #[serde(default)]
    pub sound_dir: Option<PathBuf>,
    /// Master volume, 0.0 to 1.0.
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_clue_timeout_secs() -> f32 {
    8.0
}
fn default_master_volume() -> f64 {
    0.8
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            mouse_sensitivity: default_sensitivity(),
            touch_sensitivity: default_sensitivity(),
            seed: None,
            clue_command: None,
            clue_timeout_secs: default_clue_timeout_secs(),
            sound_dir: None,
            master_volume: default_master_volume(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    c
                }
                Err(e) => {
                    log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Clue service timeout. Zero or negative means no wait at all; values
    /// too large for a `Duration` fall back to the default.
    pub fn clue_timeout(&self) -> Duration {
        let secs = self.clue_timeout_secs;
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        match Duration::try_from_secs_f32(secs) {
            Ok(timeout) => timeout,
            Err(e) => {
                let fallback = default_clue_timeout_secs();
                log::warn!("clue_timeout_secs {} is out of range ({}), using {}", secs, e, fallback);
                Duration::from_secs_f32(fallback)
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
