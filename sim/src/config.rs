//! Simulation configuration.

use crate::error::{ConfigError, ConfigResult};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (1/15 for the game's 15 Hz logic rate).
    pub fixed_timestep: f32,
    /// Size of spatial grid cells in tiles.
    pub grid_cell_size: i32,
    /// Health the player starts with.
    pub player_health: i32,
    /// Frames of invulnerability after the player got hurt.
    pub mercy_frames: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 15.0,
            grid_cell_size: 8,
            player_health: 9,
            mercy_frames: 20,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fixed_timestep",
                reason: format!("must be a positive number of seconds, got {}", self.fixed_timestep),
            });
        }
        if self.grid_cell_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "grid_cell_size",
                reason: format!("must be at least one tile, got {}", self.grid_cell_size),
            });
        }
        if self.player_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "player_health",
                reason: format!("must be positive, got {}", self.player_health),
            });
        }
        Ok(())
    }
}
