//! Score persistence
//!
//! The game only sees [`ScoreStore`]. The provided implementation encodes
//! everything as JSON on top of a string key-value backend: LocalStorage in
//! the browser, an in-memory map elsewhere. Backend failures are logged and
//! swallowed; a failed save just means the score is not recorded.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

use std::collections::HashMap;

use thiserror::Error;

use crate::highscores::{Leaderboard, LeaderboardEntry};

/// Storage key for the best score ever recorded
pub const HIGH_SCORE_KEY: &str = "grid_snake_high_score";
/// Storage key for the JSON-encoded leaderboard
pub const LEADERBOARD_KEY: &str = "grid_snake_leaderboard";

/// Errors raised by a key-value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected write to {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Minimal string key-value backend
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// What the game needs from persistent storage
pub trait ScoreStore {
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
    fn load_leaderboard(&self) -> Leaderboard;
    /// Record a finished run; returns its rank if it made the board
    fn append_leaderboard_entry(&mut self, entry: LeaderboardEntry) -> Option<usize>;
    /// Forget the leaderboard and the high score
    fn clear(&mut self);
}

/// [`ScoreStore`] that keeps JSON values in a [`KeyValueStorage`]
#[derive(Debug, Clone, Default)]
pub struct JsonScoreStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> JsonScoreStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            log::warn!("Failed to save {}: {}", key, e);
        }
    }
}

impl<S: KeyValueStorage> ScoreStore for JsonScoreStore<S> {
    fn load_high_score(&self) -> u64 {
        self.storage
            .get(HIGH_SCORE_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) {
        self.write(HIGH_SCORE_KEY, &score.to_string());
        log::info!("High score saved: {}", score);
    }

    fn load_leaderboard(&self) -> Leaderboard {
        let Some(json) = self.storage.get(LEADERBOARD_KEY) else {
            return Leaderboard::new();
        };
        match serde_json::from_str::<Leaderboard>(&json) {
            Ok(mut board) => {
                board.normalize();
                log::info!("Loaded {} leaderboard entries", board.len());
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Leaderboard::new()
            }
        }
    }

    fn append_leaderboard_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let mut board = self.load_leaderboard();
        let rank = board.insert(entry);
        if rank.is_some() {
            match serde_json::to_string(&board) {
                Ok(json) => self.write(LEADERBOARD_KEY, &json),
                Err(e) => log::warn!("Failed to encode leaderboard: {}", e),
            }
        }
        rank
    }

    fn clear(&mut self) {
        for key in [LEADERBOARD_KEY, HIGH_SCORE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("Failed to clear {}: {}", key, e);
            }
        }
        log::info!("Leaderboard cleared");
    }
}
