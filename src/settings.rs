//! Simulation settings
//!
//! Loaded from a JSON file; any missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FINISH_DELAY, MAX_TICKS, SIM_DT};
use crate::error::SimError;

/// Runtime configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds advanced per tick
    pub time_step: f32,
    /// Grace period after a win/loss before the level reports finished
    pub finish_delay: f32,
    /// Tick cap for headless runs
    pub max_ticks: u32,
    /// Seed for coin phases (None = random per run)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_step: SIM_DT,
            finish_delay: FINISH_DELAY,
            max_ticks: MAX_TICKS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::Settings)
    }

    /// Load settings from disk, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(SimError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
