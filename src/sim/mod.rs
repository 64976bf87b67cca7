//! Round simulation module
//!
//! All gameplay logic lives here. This module is frame-stepped and
//! deterministic for a given seed and input sequence:
//! - Host-supplied frame delta, one tick per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod actors;
pub mod body;
pub mod bonus;
pub mod collision;
pub mod state;
pub mod tick;

pub use actors::{
    ActorKind, BonusPickup, Coin, Enemy, Fade, Invulnerability, Missile, MissileState, Player,
    Sprite,
};
pub use body::{Body, Playfield};
pub use bonus::{BonusKind, BonusTimers};
pub use collision::{bounce_balls, overlaps};
pub use state::{
    GamePhase, GameState, HudSnapshot, RoundConfig, RoundEvent, ScoreReport, ScoreSink,
};
pub use tick::{TickInput, apply_bonus, tick};
