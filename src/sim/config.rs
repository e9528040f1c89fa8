//! Per-session game configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest playable grid (room for the spawn snake plus food)
pub const MIN_GRID_SIZE: u32 = 4;
/// Largest grid the renderer and placement are sized for
pub const MAX_GRID_SIZE: u32 = 100;

/// Errors raised when a session is started with unusable settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size {0} is below the minimum of {min}", min = MIN_GRID_SIZE)]
    GridTooSmall(u32),
    #[error("grid size {0} exceeds the maximum of {max}", max = MAX_GRID_SIZE)]
    GridTooLarge(u32),
    #[error("tick interval must be greater than zero")]
    ZeroInterval,
}

/// Configuration fixed for the lifetime of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cells per side of the square grid
    pub grid_size: u32,
    /// Leaving the grid ends the game; otherwise the snake wraps around
    pub walls_enabled: bool,
    /// Starting tick interval in milliseconds
    pub tick_interval_ms: u32,
    /// Randomly add obstacles on food pickup past level 2
    pub obstacle_growth_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            walls_enabled: true,
            tick_interval_ms: 100,
            obstacle_growth_enabled: true,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_small_grid() {
        let config = GameConfig {
            grid_size: 3,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridTooSmall(3)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_minimum_grid_accepted() {
        let config = GameConfig {
            grid_size: MIN_GRID_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
