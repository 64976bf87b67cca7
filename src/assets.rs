//! Asset handles
//!
//! Loading and streaming happen in the host. The simulation only needs opaque
//! handles, looked up by logical name once when a round is built.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Opaque drawable handle issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// Opaque playable handle issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Host-side asset lookup
pub trait AssetProvider {
    fn image(&self, name: &str) -> Option<ImageHandle>;
    fn sound(&self, name: &str) -> Option<SoundHandle>;
}

/// Logical asset names
pub mod names {
    pub const PLAYER: &str = "player.png";
    pub const PLAYER_FROZEN: &str = "player-frozen.png";
    pub const PLAYER_INVULNERABLE: &str = "player-invulnerable.png";
    pub const ENEMY: &str = "enemy.png";
    pub const COIN: &str = "coin.png";
    pub const BONUS: &str = "bonus.png";
    pub const MISSILE: &str = "missile.png";

    pub const COIN_SOUND: &str = "coin.mp3";
    pub const BONUS_SOUND: &str = "bonus.mp3";
    pub const LOST_SOUND: &str = "lost.mp3";
    pub const HIGH_SCORE_SOUND: &str = "highscore.mp3";
}

/// Images and sounds a round draws and plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAssets {
    pub player: ImageHandle,
    pub player_frozen: ImageHandle,
    pub player_invulnerable: ImageHandle,
    pub enemy: ImageHandle,
    pub coin: ImageHandle,
    pub bonus: ImageHandle,
    pub missile: ImageHandle,
    pub coin_sound: SoundHandle,
    pub bonus_sound: SoundHandle,
    pub lost_sound: SoundHandle,
    pub high_score_sound: SoundHandle,
}

impl RoundAssets {
    /// Look up every handle up front so a missing asset fails before the round starts
    pub fn resolve(provider: &dyn AssetProvider) -> Result<Self, SimError> {
        let image = |name: &'static str| {
            provider
                .image(name)
                .ok_or(SimError::MissingImage { name })
        };
        let sound = |name: &'static str| {
            provider
                .sound(name)
                .ok_or(SimError::MissingSound { name })
        };

        Ok(Self {
            player: image(names::PLAYER)?,
            player_frozen: image(names::PLAYER_FROZEN)?,
            player_invulnerable: image(names::PLAYER_INVULNERABLE)?,
            enemy: image(names::ENEMY)?,
            coin: image(names::COIN)?,
            bonus: image(names::BONUS)?,
            missile: image(names::MISSILE)?,
            coin_sound: sound(names::COIN_SOUND)?,
            bonus_sound: sound(names::BONUS_SOUND)?,
            lost_sound: sound(names::LOST_SOUND)?,
            high_score_sound: sound(names::HIGH_SCORE_SOUND)?,
        })
    }
}

/// Provider that hands out a distinct handle for every name it is asked for
///
/// Used by the headless host and tests, where nothing is actually drawn.
#[derive(Debug, Default)]
pub struct PlaceholderAssets;

impl PlaceholderAssets {
    fn id(name: &str) -> u32 {
        // FNV-1a keeps ids stable across runs
        name.bytes()
            .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
    }
}

impl AssetProvider for PlaceholderAssets {
    fn image(&self, name: &str) -> Option<ImageHandle> {
        Some(ImageHandle(Self::id(name)))
    }

    fn sound(&self, name: &str) -> Option<SoundHandle> {
        Some(SoundHandle(Self::id(name)))
    }
}
