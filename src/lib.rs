//! Grid Snake - classic snake on a square board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, levels)
//! - `scheduler`: Fixed-interval tick timing driven by frame time
//! - `session`: Run lifecycle, sounds and score bookkeeping
//! - `renderer`: Draw list construction and the WebGPU pipeline
//! - `input`: Keyboard mapping
//! - `persistence`: Best score and leaderboard storage
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use scheduler::{Scheduler, SchedulerState};
pub use session::{GameOverSummary, Session};
pub use settings::{Difficulty, KeyboardLayout, Settings};
