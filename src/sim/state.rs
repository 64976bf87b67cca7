//! Round state and core simulation types
//!
//! A `GameState` owns every actor and timer for one round. Nothing outside
//! the tick mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::{BonusPickup, Coin, Enemy, Missile, Player, Sprite};
use super::body::Playfield;
use super::bonus::{BonusKind, BonusTimers, next_bonus_delay};
use crate::assets::{AssetProvider, RoundAssets, SoundHandle};
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::{Difficulty, DifficultyParams, GameMode};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player was hit; fading out before the score is reported. Terminal.
    Ending { fade_remaining: f32 },
}

/// Everything a round needs from its host, fixed for the round's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub playfield: Playfield,
    /// Sound volume (0.0 - 1.0)
    pub volume: f32,
    /// Seed for all round randomness
    pub seed: u64,
}

impl RoundConfig {
    pub fn new(mode: GameMode, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            mode,
            difficulty,
            playfield: Playfield {
                width: PLAYFIELD_WIDTH,
                height: PLAYFIELD_HEIGHT,
            },
            volume: 1.0,
            seed,
        }
    }
}

/// Something that happened during a tick, for the host's audio/HUD layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    PlaySound { sound: SoundHandle, volume: f32 },
    CoinCollected { coins: u32 },
    BonusCollected { kind: BonusKind },
    BonusShown,
    EnemyAdded { enemies: usize },
    PlayerFrozen,
    PlayerUnfrozen,
    InvulnerabilityEnding,
    PlayerVulnerable,
    MissileLaunched,
    MissileGone,
    /// Player was hit; the round is now ending
    PlayerLost,
    /// Fade-out done and the score has been reported
    RoundOver { score: u32 },
    /// The reported score made the leaderboard (0-based rank)
    HighScore { rank: usize },
}

/// Final result handed to the score sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub score: u32,
}

/// Receives the final score, exactly once per round
///
/// Implementations must not block: persisting is the host's business.
pub trait ScoreSink {
    fn submit_score(&mut self, report: ScoreReport);
}

impl ScoreSink for Vec<ScoreReport> {
    fn submit_score(&mut self, report: ScoreReport) {
        self.push(report);
    }
}

/// Values the HUD draws each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub mode: GameMode,
    /// Whole seconds survived (Time) or coins collected (Coins)
    pub score: u32,
    pub elapsed: f32,
    pub enemies: usize,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: RoundConfig,
    pub params: DifficultyParams,
    pub assets: RoundAssets,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds since the round started
    pub elapsed: f32,
    pub coins: u32,
    /// Until the next enemy in Time mode
    pub new_enemy_timer: f32,
    pub timers: BonusTimers,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Present only in Coins mode
    pub coin: Option<Coin>,
    pub bonus: BonusPickup,
    pub missile: Missile,
    /// Set once the score has gone to the sink
    pub score_reported: bool,
    /// Events from the last tick (cleared at the start of each tick)
    pub events: Vec<RoundEvent>,
}

impl GameState {
    /// Set up a round: resolve assets, place the player and starting enemies
    pub fn new(config: RoundConfig, provider: &dyn AssetProvider) -> Result<Self, SimError> {
        let field = Playfield::new(config.playfield.width, config.playfield.height)?;
        let config = RoundConfig {
            playfield: field,
            volume: if config.volume.is_finite() {
                config.volume.clamp(0.0, 1.0)
            } else {
                1.0
            },
            ..config
        };
        let assets = RoundAssets::resolve(provider)?;
        let params = config.difficulty.params();
        let mut rng = Pcg32::seed_from_u64(config.seed);

        let player = Player::new(&field)?;
        let bonus = BonusPickup::new(&field)?;
        let missile = Missile::new(&field)?;

        let mut enemies = Vec::with_capacity(STARTING_ENEMIES * 4);
        for _ in 0..STARTING_ENEMIES {
            enemies.push(Enemy::spawn(
                &field,
                player.body.pos,
                params.enemy_speed,
                &mut rng,
            )?);
        }

        let coin = match config.mode {
            GameMode::Coins => Some(Coin::spawn(&field, player.body.pos, &mut rng)?),
            GameMode::Time => None,
        };

        let timers = BonusTimers::new(next_bonus_delay(&mut rng));

        log::info!(
            "Round start: mode={} difficulty={} seed={} playfield={}x{}",
            config.mode.as_str(),
            config.difficulty.as_str(),
            config.seed,
            field.width,
            field.height
        );

        Ok(Self {
            config,
            params,
            assets,
            rng,
            phase: GamePhase::Running,
            elapsed: 0.0,
            coins: 0,
            new_enemy_timer: params.new_enemy_interval,
            timers,
            player,
            enemies,
            coin,
            bonus,
            missile,
            score_reported: false,
            events: Vec::new(),
        })
    }

    #[inline]
    pub fn playfield(&self) -> Playfield {
        self.config.playfield
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn is_ending(&self) -> bool {
        matches!(self.phase, GamePhase::Ending { .. })
    }

    /// Fade-out finished and the score has been handed over
    pub fn is_over(&self) -> bool {
        self.score_reported
    }

    /// Score for the active mode
    pub fn score(&self) -> u32 {
        match self.config.mode {
            GameMode::Time => self.elapsed as u32,
            GameMode::Coins => self.coins,
        }
    }

    pub fn enemy_speed_factor(&self) -> f32 {
        self.timers.enemy_speed_factor()
    }

    /// Append one enemy ball away from the player
    pub fn add_enemy(&mut self) {
        let field = self.playfield();
        match Enemy::spawn(
            &field,
            self.player.body.pos,
            self.params.enemy_speed,
            &mut self.rng,
        ) {
            Ok(enemy) => {
                self.enemies.push(enemy);
                log::debug!("Enemy added ({} total)", self.enemies.len());
                self.events.push(RoundEvent::EnemyAdded {
                    enemies: self.enemies.len(),
                });
            }
            // The field already fit the starting enemies, so this cannot happen mid-round
            Err(e) => log::warn!("Could not add enemy: {}", e),
        }
    }

    pub(crate) fn play(&mut self, sound: SoundHandle) {
        self.events.push(RoundEvent::PlaySound {
            sound,
            volume: self.config.volume,
        });
    }

    /// Cue the high-score fanfare once the host has ranked the score
    pub fn high_score_reached(&mut self, rank: usize) {
        log::debug!("High score cue for rank {}", rank + 1);
        self.events.push(RoundEvent::HighScore { rank });
        self.play(self.assets.high_score_sound);
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            mode: self.config.mode,
            score: self.score(),
            elapsed: self.elapsed,
            enemies: self.enemies.len(),
        }
    }

    /// Draw list, back to front: bonus, coin, player, enemies, missile
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::with_capacity(self.enemies.len() + 4);
        sprites.push(self.bonus.sprite(&self.assets));
        if let Some(coin) = &self.coin {
            sprites.push(coin.sprite(&self.assets));
        }
        sprites.push(self.player.sprite(&self.assets));
        sprites.extend(self.enemies.iter().map(|e| e.sprite(&self.assets)));
        sprites.push(self.missile.sprite(&self.assets));
        sprites
    }

    /// Player centre, for callers placing things relative to it
    pub fn player_pos(&self) -> Vec2 {
        self.player.body.pos
    }
}
