//! Collision - A single-screen ball avoidance arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (bodies, collisions, bonuses, round loop)
//! - `tuning`: Difficulty tiers and game modes
//! - `assets`: Image/sound handles supplied by the host
//! - `settings`: Player preferences
//! - `highscores`: Per-mode, per-difficulty leaderboard

pub mod assets;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{SettingsError, SimError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyParams, GameMode};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions (the game window size)
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Frame delta used by the headless host
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Number of enemy balls present when a round starts
    pub const STARTING_ENEMIES: usize = 3;
    /// Mass of every enemy ball
    pub const ENEMY_MASS: f32 = 1.0;

    /// Window (seconds) in which a new bonus appears
    pub const NEW_BONUS_MIN_TIME: f32 = 3.0;
    pub const NEW_BONUS_MAX_TIME: f32 = 10.0;

    /// Minimum spawn distances from the player
    pub const ENEMY_MIN_PLAYER_DISTANCE: f32 = 100.0;
    pub const COIN_MIN_PLAYER_DISTANCE: f32 = 200.0;
    pub const BONUS_MIN_PLAYER_DISTANCE: f32 = 200.0;
    pub const MISSILE_MIN_PLAYER_DISTANCE: f32 = 200.0;
    /// Random placement gives up after this many tries and keeps the last spot
    pub const PLACEMENT_ATTEMPTS: u32 = 64;

    /// Player keyboard speed (pixels/s)
    pub const PLAYER_KEY_SPEED: f32 = 300.0;

    /// Actor radii (half of the sprite sizes)
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const ENEMY_RADIUS: f32 = 16.0;
    pub const COIN_RADIUS: f32 = 12.0;
    pub const BONUS_RADIUS: f32 = 16.0;
    pub const MISSILE_RADIUS: f32 = 10.0;

    /// Fade durations (seconds)
    pub const BONUS_FADE_IN: f32 = 0.5;
    pub const MISSILE_FADE_IN: f32 = 0.5;
    pub const COIN_FADE_IN: f32 = 1.0;
    pub const PLAYER_FADE_OUT: f32 = 2.0;

    /// Invulnerability ending: the player blinks this many times
    pub const INVULNERABILITY_BLINKS: u32 = 4;
    /// Length of one blink (half hidden, half shown)
    pub const INVULNERABILITY_BLINK_TIME: f32 = 0.25;
    /// Total extra protection after the invulnerability timer runs out
    pub const INVULNERABILITY_ENDING_TIME: f32 =
        INVULNERABILITY_BLINKS as f32 * INVULNERABILITY_BLINK_TIME;
}

/// Angle of a direction vector in radians, measured from +x
#[inline]
pub fn heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
