//! Simulation settings
//!
//! Loaded from an optional JSON file. Every field has a default, so a file
//! only needs to name what it changes.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::RobotParams;

/// Errors produced while reading or writing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error on settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Room, robot and driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Room ===
    pub room_width: f64,
    pub room_height: f64,
    /// Side length of generated square blocks
    pub block_size: f64,
    /// Autonomous turn-and-retry passes per robot per tick
    pub max_turn_retries: u32,

    // === Robots ===
    /// Template for generated robots (center is ignored)
    pub robot: RobotParams,

    // === Scenario ===
    /// Seed for scene generation
    pub seed: u64,
    pub robot_count: usize,
    pub block_count: usize,

    // === Driver ===
    /// Synthetic frame rate
    pub frame_rate_hz: u32,
    /// Simulated seconds to run
    pub run_secs: f64,
    /// Second to rewind to once the run ends
    pub rewind_to_second: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            room_width: ROOM_WIDTH,
            room_height: ROOM_HEIGHT,
            block_size: BLOCK_SIZE,
            max_turn_retries: MAX_TURN_RETRIES,

            robot: RobotParams::default(),

            seed: 0,
            robot_count: 4,
            block_count: 6,

            frame_rate_hz: 60,
            run_secs: 10.0,
            rewind_to_second: Some(5),
        }
    }
}

impl Settings {
    /// Parse settings JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring settings in {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Cannot read settings {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Nanoseconds between synthetic frames (0 Hz is treated as 1 Hz)
    pub fn frame_interval_nanos(&self) -> u64 {
        NANOS_PER_SEC / u64::from(self.frame_rate_hz.max(1))
    }

    /// Number of frames needed to cover `run_secs`
    pub fn frame_count(&self) -> u64 {
        if !(self.run_secs > 0.0) {
            return 0;
        }
        (self.run_secs * NANOS_PER_SEC as f64 / self.frame_interval_nanos() as f64).ceil() as u64
    }
}
