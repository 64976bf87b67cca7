//! Data-driven game balance
//!
//! Difficulty tiers and game modes. Both are plain data, picked between
//! rounds and read-only while a round runs.

use serde::{Deserialize, Serialize};

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Numbers behind a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Base speed of the enemy balls (pixels/s)
    pub enemy_speed: f32,
    /// Seconds between enemy additions in Time mode
    pub new_enemy_interval: f32,
    /// Coins needed for an enemy addition in Coins mode
    pub new_enemy_coins: u32,
    /// Homing missile speed (pixels/s)
    pub missile_speed: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                enemy_speed: 200.0,
                new_enemy_interval: 15.0,
                new_enemy_coins: 10,
                missile_speed: 200.0,
            },
            Difficulty::Medium => DifficultyParams {
                enemy_speed: 300.0,
                new_enemy_interval: 15.0,
                new_enemy_coins: 10,
                missile_speed: 200.0,
            },
            Difficulty::Hard => DifficultyParams {
                enemy_speed: 400.0,
                new_enemy_interval: 15.0,
                new_enemy_coins: 10,
                missile_speed: 200.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Which metric the round is scored by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Score = seconds survived; enemies added on a fixed interval
    #[default]
    Time,
    /// Score = coins collected; enemies added every N coins
    Coins,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Time, GameMode::Coins];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Time => "Time",
            GameMode::Coins => "Coins",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "time" => Some(GameMode::Time),
            "coins" | "coin" => Some(GameMode::Coins),
            _ => None,
        }
    }
}
