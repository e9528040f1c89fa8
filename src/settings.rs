//! Game settings and preferences
//!
//! Persisted separately from scores as JSON.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStorage;
use crate::sim::GameConfig;

/// Grid sizes offered by the settings form
pub const GRID_SIZE_CHOICES: [u32; 4] = [15, 20, 25, 30];

/// Difficulty levels, mapping to starting tick speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Milliseconds per tick at level 1
    pub fn tick_interval_ms(&self) -> u32 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Medium => 100,
            Difficulty::Hard => 60,
            Difficulty::Extreme => 40,
        }
    }
}

/// Which letter keys steer the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    /// Z/Q/S/D
    #[default]
    Azerty,
    /// W/A/S/D
    Qwerty,
}

impl KeyboardLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyboardLayout::Azerty => "azerty",
            KeyboardLayout::Qwerty => "qwerty",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "azerty" => Some(KeyboardLayout::Azerty),
            "qwerty" => Some(KeyboardLayout::Qwerty),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub grid_size: u32,
    pub walls_enabled: bool,
    pub sound_enabled: bool,
    pub keyboard_layout: KeyboardLayout,
    /// Obstacles appear as the level rises
    pub obstacle_growth: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            grid_size: 20,
            walls_enabled: true,
            sound_enabled: true,
            keyboard_layout: KeyboardLayout::Azerty,
            obstacle_growth: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "grid_snake_settings";

    /// Configuration for the next session
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            walls_enabled: self.walls_enabled,
            tick_interval_ms: self.difficulty.tick_interval_ms(),
            obstacle_growth_enabled: self.obstacle_growth,
        }
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(storage: &impl KeyValueStorage) -> Self {
        let Some(json) = storage.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut impl KeyValueStorage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}
