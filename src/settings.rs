//! Runtime configuration
//!
//! Read once at startup and never written back; session state is never
//! persisted. `RETRO_INVADERS_CONFIG` names an optional JSON file,
//! `RETRO_INVADERS_SEED` forces a seed for reproducible runs.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Use the color palette (off for monochrome terminals)
    pub color: bool,
    /// Show the FPS counter on the HUD
    pub show_fps: bool,
    /// Frame pacing target
    pub target_fps: u32,
    /// Fixed session seed; a fresh random seed per session when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            show_fps: false,
            target_fps: 60,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings, degrading to defaults on any failure.
    pub fn load() -> Self {
        let mut settings = match std::env::var("RETRO_INVADERS_CONFIG") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("loaded settings from {path}");
                        settings
                    }
                    Err(err) => {
                        log::warn!("invalid settings file {path}: {err}");
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!("unreadable settings file {path}: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var("RETRO_INVADERS_SEED") {
            match raw.parse() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => log::warn!("ignoring non-numeric RETRO_INVADERS_SEED {raw:?}"),
            }
        }
        settings
    }
}
