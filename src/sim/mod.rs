//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One grid step per tick
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod config;
pub mod grid;
pub mod state;
pub mod tick;

pub use config::{ConfigError, GameConfig, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use grid::{Cell, Grid};
pub use state::{CollisionKind, Direction, GamePhase, GameState, RunState, Snake};
pub use tick::{TickEvent, TickResult, random_free_cell, set_direction, tick};
