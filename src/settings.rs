//! Game settings
//!
//! Read from a JSON file next to the catalog. Missing fields fall back to
//! the built-in defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whole-session countdown (seconds)
    pub game_seconds: u32,
    /// Guess window per round (seconds)
    pub round_seconds: u32,
    /// Answer display time between rounds (ms)
    pub reveal_delay_ms: u64,
    /// Guess flag height above the picked point (metres)
    pub flag_lift_m: f64,
    /// Session seed (shuffle, avatars, noise). Random when absent.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_seconds: GAME_SECONDS,
            round_seconds: ROUND_SECONDS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            flag_lift_m: FLAG_LIFT,
            seed: None,
        }
    }
}

impl Settings {
    /// Settings with a fixed seed (reproducible sessions)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Clamp durations to something playable
    pub fn sanitized(mut self) -> Self {
        self.game_seconds = self.game_seconds.max(1);
        self.round_seconds = self.round_seconds.max(1);
        if !self.flag_lift_m.is_finite() || self.flag_lift_m < 0.0 {
            self.flag_lift_m = FLAG_LIFT;
        }
        self
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
