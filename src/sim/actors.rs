//! Actors: the player, enemy balls, the coin, the bonus pickup and the missile
//!
//! Every actor owns a [`Body`] plus the few flags its kind needs. Visual
//! sequences (fades, blinking) are explicit timed sub-states advanced by the
//! round's tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Playfield};
use crate::assets::{ImageHandle, RoundAssets};
use crate::consts::*;
use crate::error::SimError;
use crate::{direction, heading};

/// Actor discriminant, used by draw records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
    Coin,
    Bonus,
    Missile,
}

/// What the external renderer needs to draw one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: ActorKind,
    pub image: ImageHandle,
    /// Centre
    pub pos: Vec2,
    pub radius: f32,
    /// 0 = invisible, 1 = opaque
    pub alpha: f32,
    /// Radians from +x
    pub rotation: f32,
}

/// Linear opacity animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub alpha: f32,
    target: f32,
    /// Alpha units per second (0 = idle)
    rate: f32,
}

impl Fade {
    pub fn visible() -> Self {
        Self {
            alpha: 1.0,
            target: 1.0,
            rate: 0.0,
        }
    }

    pub fn hidden() -> Self {
        Self {
            alpha: 0.0,
            target: 0.0,
            rate: 0.0,
        }
    }

    /// Animate from the current alpha to `target` over `duration` seconds
    pub fn to(&mut self, target: f32, duration: f32) {
        self.target = target;
        if duration <= 0.0 {
            self.alpha = target;
            self.rate = 0.0;
        } else {
            self.rate = 1.0 / duration;
        }
    }

    /// Snap to a value and stop animating
    pub fn set(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.target = alpha;
        self.rate = 0.0;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.rate > 0.0
    }

    /// Step the animation; true on the tick it completes
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        let step = self.rate * dt;
        if (self.target - self.alpha).abs() <= step {
            self.alpha = self.target;
            self.rate = 0.0;
            true
        } else {
            self.alpha += step * (self.target - self.alpha).signum();
            false
        }
    }
}

/// Player invulnerability sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Invulnerability {
    Off,
    /// Bonus timer still running
    Active,
    /// Timer ran out; blinking before protection ends
    Ending { remaining: f32 },
}

/// The player ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub enabled: bool,
    pub frozen: bool,
    pub invulnerability: Invulnerability,
    pub fade: Fade,
}

impl Player {
    /// Player centred on the playfield
    pub fn new(field: &Playfield) -> Result<Self, SimError> {
        Ok(Self {
            body: Body::inside(field, field.center(), PLAYER_RADIUS)?,
            enabled: true,
            frozen: false,
            invulnerability: Invulnerability::Off,
            fade: Fade::visible(),
        })
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability != Invulnerability::Off
    }

    /// Whether the player is waiting on the blink sequence
    pub fn is_invulnerability_ending(&self) -> bool {
        matches!(self.invulnerability, Invulnerability::Ending { .. })
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Start (or restart) invulnerability, cancelling any ending sequence
    pub fn make_invulnerable(&mut self) {
        self.invulnerability = Invulnerability::Active;
    }

    /// Begin the blink sequence that ends invulnerability
    ///
    /// Returns false (and does nothing) unless currently `Active`, so a timer
    /// sitting below zero for several ticks only starts it once.
    pub fn make_vulnerable(&mut self) -> bool {
        if self.invulnerability != Invulnerability::Active {
            return false;
        }
        self.invulnerability = Invulnerability::Ending {
            remaining: INVULNERABILITY_ENDING_TIME,
        };
        true
    }

    /// Move by an input displacement unless frozen or disabled
    pub fn move_by(&mut self, displacement: Vec2, field: &Playfield) {
        if !self.enabled || self.frozen {
            return;
        }
        self.body.pos += displacement;
        self.body.clamp_to(field);
    }

    /// Advance visual sub-states; true on the tick protection finally ends
    pub fn update(&mut self, dt: f32) -> bool {
        self.fade.update(dt);
        if let Invulnerability::Ending { remaining } = &mut self.invulnerability {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.invulnerability = Invulnerability::Off;
                return true;
            }
        }
        false
    }

    /// Start the game-over fade
    pub fn fade_out(&mut self) {
        self.fade.to(0.0, PLAYER_FADE_OUT);
    }

    /// Opacity including the invulnerability blink
    pub fn alpha(&self) -> f32 {
        match self.invulnerability {
            Invulnerability::Ending { remaining } => {
                let elapsed = INVULNERABILITY_ENDING_TIME - remaining;
                let phase = (elapsed / INVULNERABILITY_BLINK_TIME).fract();
                if phase < 0.5 { 0.0 } else { self.fade.alpha }
            }
            _ => self.fade.alpha,
        }
    }

    pub fn sprite(&self, assets: &RoundAssets) -> Sprite {
        let image = if self.frozen {
            assets.player_frozen
        } else if self.is_invulnerable() {
            assets.player_invulnerable
        } else {
            assets.player
        };
        Sprite {
            kind: ActorKind::Player,
            image,
            pos: self.body.pos,
            radius: self.body.radius,
            alpha: self.alpha(),
            rotation: 0.0,
        }
    }
}

/// An enemy ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub mass: f32,
    pub enabled: bool,
}

impl Enemy {
    /// Enemy at a random spot away from the player, heading in a random direction
    pub fn spawn<R: Rng + ?Sized>(
        field: &Playfield,
        player_pos: Vec2,
        speed: f32,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let pos =
            field.random_center_far_from(ENEMY_RADIUS, player_pos, ENEMY_MIN_PLAYER_DISTANCE, rng);
        let mut body = Body::inside(field, pos, ENEMY_RADIUS)?;
        body.vel = direction(rng.random_range(0.0..std::f32::consts::TAU)) * speed;
        Ok(Self {
            body,
            mass: ENEMY_MASS,
            enabled: true,
        })
    }

    /// Move at `factor` times the base velocity, bouncing off the walls
    pub fn update(&mut self, dt: f32, factor: f32, field: &Playfield) {
        if !self.enabled {
            return;
        }
        self.body.integrate_bouncing(field, dt, factor);
    }

    /// Stop and take out of play
    pub fn disable(&mut self) {
        self.enabled = false;
        self.body.vel = Vec2::ZERO;
    }

    pub fn sprite(&self, assets: &RoundAssets) -> Sprite {
        Sprite {
            kind: ActorKind::Enemy,
            image: assets.enemy,
            pos: self.body.pos,
            radius: self.body.radius,
            alpha: 1.0,
            rotation: 0.0,
        }
    }
}

/// The Coins-mode coin (one instance, moved on every pickup)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub body: Body,
    /// False until the initial fade-in completes
    pub enabled: bool,
    pub fade: Fade,
}

impl Coin {
    pub fn spawn<R: Rng + ?Sized>(
        field: &Playfield,
        player_pos: Vec2,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let pos =
            field.random_center_far_from(COIN_RADIUS, player_pos, COIN_MIN_PLAYER_DISTANCE, rng);
        let mut fade = Fade::hidden();
        fade.to(1.0, COIN_FADE_IN);
        Ok(Self {
            body: Body::inside(field, pos, COIN_RADIUS)?,
            enabled: false,
            fade,
        })
    }

    pub fn relocate<R: Rng + ?Sized>(&mut self, field: &Playfield, player_pos: Vec2, rng: &mut R) {
        self.body.pos = field.random_center_far_from(
            self.body.radius,
            player_pos,
            COIN_MIN_PLAYER_DISTANCE,
            rng,
        );
    }

    pub fn update(&mut self, dt: f32) {
        if self.fade.update(dt) {
            self.enabled = true;
        }
    }

    pub fn sprite(&self, assets: &RoundAssets) -> Sprite {
        Sprite {
            kind: ActorKind::Coin,
            image: assets.coin,
            pos: self.body.pos,
            radius: self.body.radius,
            alpha: self.fade.alpha,
            rotation: 0.0,
        }
    }
}

/// The bonus pickup (one instance, shown and hidden repeatedly)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusPickup {
    pub body: Body,
    pub enabled: bool,
    pub fade: Fade,
}

impl BonusPickup {
    /// Hidden pickup parked at the centre
    pub fn new(field: &Playfield) -> Result<Self, SimError> {
        Ok(Self {
            body: Body::inside(field, field.center(), BONUS_RADIUS)?,
            enabled: false,
            fade: Fade::hidden(),
        })
    }

    /// Place somewhere away from the player and fade in; no-op if shown
    pub fn show<R: Rng + ?Sized>(&mut self, field: &Playfield, player_pos: Vec2, rng: &mut R) {
        if self.enabled {
            return;
        }
        self.body.pos = field.random_center_far_from(
            self.body.radius,
            player_pos,
            BONUS_MIN_PLAYER_DISTANCE,
            rng,
        );
        self.enabled = true;
        self.fade.set(0.0);
        self.fade.to(1.0, BONUS_FADE_IN);
    }

    pub fn hide(&mut self) {
        self.enabled = false;
        self.fade.set(0.0);
    }

    pub fn update(&mut self, dt: f32) {
        self.fade.update(dt);
    }

    pub fn sprite(&self, assets: &RoundAssets) -> Sprite {
        Sprite {
            kind: ActorKind::Bonus,
            image: assets.bonus,
            pos: self.body.pos,
            radius: self.body.radius,
            alpha: self.fade.alpha,
            rotation: 0.0,
        }
    }
}

/// Missile lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileState {
    /// Invisible and harmless
    Dormant,
    /// Fading in; harmless until the fade completes
    Arming,
    /// Homing and lethal
    Active,
}

/// The homing missile (one instance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub body: Body,
    pub state: MissileState,
    pub fade: Fade,
    /// Radians from +x, always pointing at the player
    pub rotation: f32,
}

impl Missile {
    pub fn new(field: &Playfield) -> Result<Self, SimError> {
        Ok(Self {
            body: Body::inside(field, field.center(), MISSILE_RADIUS)?,
            state: MissileState::Dormant,
            fade: Fade::hidden(),
            rotation: 0.0,
        })
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state == MissileState::Active
    }

    /// Place away from the player and start arming; no-op if already active
    pub fn show<R: Rng + ?Sized>(&mut self, field: &Playfield, player_pos: Vec2, rng: &mut R) {
        if self.is_enabled() {
            return;
        }
        self.body.pos = field.random_center_far_from(
            self.body.radius,
            player_pos,
            MISSILE_MIN_PLAYER_DISTANCE,
            rng,
        );
        self.body.vel = Vec2::ZERO;
        self.aim_at(player_pos);
        self.state = MissileState::Arming;
        self.fade.set(0.0);
        self.fade.to(1.0, MISSILE_FADE_IN);
    }

    /// Disarm and hide; no-op unless active
    pub fn hide(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state = MissileState::Dormant;
        self.body.vel = Vec2::ZERO;
        self.fade.set(0.0);
    }

    fn aim_at(&mut self, target: Vec2) {
        let to_target = target - self.body.pos;
        if to_target != Vec2::ZERO {
            self.rotation = heading(to_target);
        }
    }

    /// Turn toward the player (even when dormant) and home in while active
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        chase: bool,
        speed: f32,
        field: &Playfield,
    ) {
        self.aim_at(player_pos);

        if self.fade.update(dt) && self.state == MissileState::Arming {
            self.state = MissileState::Active;
        }

        if self.is_enabled() && chase {
            self.body.vel = direction(self.rotation) * speed;
            self.body.integrate(dt, 1.0);
            self.body.clamp_to(field);
        } else {
            self.body.vel = Vec2::ZERO;
        }
    }

    pub fn sprite(&self, assets: &RoundAssets) -> Sprite {
        Sprite {
            kind: ActorKind::Missile,
            image: assets.missile,
            pos: self.body.pos,
            radius: self.body.radius,
            alpha: self.fade.alpha,
            rotation: self.rotation,
        }
    }
}
