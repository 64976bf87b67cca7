//! Bonus effects and their countdown timers
//!
//! Each effect has its own timer. The three enemy-speed effects are mutually
//! exclusive: starting one zeroes the other two.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{NEW_BONUS_MAX_TIME, NEW_BONUS_MIN_TIME};

/// Bonus (or anti-bonus) effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Enemies move at half speed
    SlowDownEnemies,
    /// Enemies move 50% faster
    SpeedUpEnemies,
    /// Enemies stop in place
    FreezeEnemies,
    /// Player cannot move
    FreezePlayer,
    /// Player ignores lethal contact
    Invulnerability,
    /// A homing missile chases the player
    Missile,
}

impl BonusKind {
    pub const ALL: [BonusKind; 6] = [
        BonusKind::SlowDownEnemies,
        BonusKind::SpeedUpEnemies,
        BonusKind::FreezeEnemies,
        BonusKind::FreezePlayer,
        BonusKind::Invulnerability,
        BonusKind::Missile,
    ];

    /// Seconds the effect lasts
    pub fn duration(&self) -> f32 {
        match self {
            BonusKind::SlowDownEnemies => 6.0,
            BonusKind::SpeedUpEnemies => 3.0,
            BonusKind::FreezeEnemies => 5.0,
            BonusKind::FreezePlayer => 0.6,
            BonusKind::Invulnerability => 5.0,
            BonusKind::Missile => 7.0,
        }
    }

    /// Whether the effect helps the player. Not used for selection.
    pub fn is_good(&self) -> bool {
        matches!(
            self,
            BonusKind::SlowDownEnemies | BonusKind::FreezeEnemies | BonusKind::Invulnerability
        )
    }

    /// Whether the effect changes enemy speed
    pub fn affects_enemies(&self) -> bool {
        matches!(
            self,
            BonusKind::SlowDownEnemies | BonusKind::SpeedUpEnemies | BonusKind::FreezeEnemies
        )
    }

    /// Uniform pick over all kinds
    pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Random delay before the next bonus appears
pub fn next_bonus_delay<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(NEW_BONUS_MIN_TIME..=NEW_BONUS_MAX_TIME)
}

/// Countdown timers for the round's bonus machinery
///
/// Timers count down past zero; "active" means strictly positive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonusTimers {
    /// Until the bonus pickup is shown again
    pub next_bonus: f32,
    pub slow_down_enemies: f32,
    pub speed_up_enemies: f32,
    pub freeze_enemies: f32,
    pub freeze_player: f32,
    pub invulnerability: f32,
    pub missile: f32,
}

impl BonusTimers {
    pub fn new(next_bonus: f32) -> Self {
        Self {
            next_bonus,
            ..Default::default()
        }
    }

    /// Count every timer down by `dt`
    pub fn advance(&mut self, dt: f32) {
        self.next_bonus -= dt;
        self.slow_down_enemies -= dt;
        self.speed_up_enemies -= dt;
        self.freeze_enemies -= dt;
        self.freeze_player -= dt;
        self.invulnerability -= dt;
        self.missile -= dt;
    }

    /// Start an effect's timer
    ///
    /// Enemy-speed effects reset the other two to zero.
    pub fn start(&mut self, kind: BonusKind) {
        let duration = kind.duration();
        if kind.affects_enemies() {
            self.slow_down_enemies = 0.0;
            self.speed_up_enemies = 0.0;
            self.freeze_enemies = 0.0;
        }
        match kind {
            BonusKind::SlowDownEnemies => self.slow_down_enemies = duration,
            BonusKind::SpeedUpEnemies => self.speed_up_enemies = duration,
            BonusKind::FreezeEnemies => self.freeze_enemies = duration,
            BonusKind::FreezePlayer => self.freeze_player = duration,
            BonusKind::Invulnerability => self.invulnerability = duration,
            BonusKind::Missile => self.missile = duration,
        }
    }

    /// Seconds left on an effect (may be negative once expired)
    pub fn remaining(&self, kind: BonusKind) -> f32 {
        match kind {
            BonusKind::SlowDownEnemies => self.slow_down_enemies,
            BonusKind::SpeedUpEnemies => self.speed_up_enemies,
            BonusKind::FreezeEnemies => self.freeze_enemies,
            BonusKind::FreezePlayer => self.freeze_player,
            BonusKind::Invulnerability => self.invulnerability,
            BonusKind::Missile => self.missile,
        }
    }

    #[inline]
    pub fn is_active(&self, kind: BonusKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Multiplier on enemy speed: slow-down, then speed-up, then freeze
    pub fn enemy_speed_factor(&self) -> f32 {
        if self.is_active(BonusKind::SlowDownEnemies) {
            0.5
        } else if self.is_active(BonusKind::SpeedUpEnemies) {
            1.5
        } else if self.is_active(BonusKind::FreezeEnemies) {
            0.0
        } else {
            1.0
        }
    }

    /// Enemy-speed effects currently running
    pub fn active_enemy_effects(&self) -> usize {
        BonusKind::ALL
            .iter()
            .filter(|k| k.affects_enemies() && self.is_active(**k))
            .count()
    }

    /// Active effects, for HUD display
    pub fn active(&self) -> impl Iterator<Item = (BonusKind, f32)> + '_ {
        BonusKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .map(|k| (k, self.remaining(k)))
    }
}
