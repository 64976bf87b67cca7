//! Collision entry point
//!
//! Headless native host: plays one round per game mode with a simple
//! autopilot, feeds the results into the high-score table and prints it.
//! A graphical host drives the same `tick` from its render loop.

use glam::Vec2;

use collision::assets::PlaceholderAssets;
use collision::consts::FRAME_DT;
use collision::sim::{GameState, RoundConfig, RoundEvent, ScoreReport, TickInput, tick};
use collision::{GameMode, HighScores, Settings};

/// Give up on a round after this many simulated seconds
const MAX_ROUND_SECONDS: f32 = 300.0;

/// Steer away from nearby threats and toward the coin
fn autopilot(state: &GameState) -> TickInput {
    let me = state.player_pos();
    let field = state.playfield();

    let mut push = Vec2::ZERO;
    let threats = state
        .enemies
        .iter()
        .filter(|e| e.enabled)
        .map(|e| e.body.pos)
        .chain(state.missile.is_enabled().then_some(state.missile.body.pos));
    for threat in threats {
        let away = me - threat;
        let dist = away.length().max(1.0);
        push += away / (dist * dist);
    }

    // Walls repel too, so the player doesn't get cornered
    push.x += 1.0 / me.x.max(1.0) - 1.0 / (field.width - me.x).max(1.0);
    push.y += 1.0 / me.y.max(1.0) - 1.0 / (field.height - me.y).max(1.0);

    if let Some(coin) = state.coin.as_ref().filter(|c| c.enabled) {
        push += (coin.body.pos - me).normalize_or_zero() * 0.002;
    }

    TickInput {
        right: push.x > 1e-4,
        left: push.x < -1e-4,
        up: push.y > 1e-4,
        down: push.y < -1e-4,
        pointer_delta: Vec2::ZERO,
    }
}

fn play_round(settings: &Settings, mode: GameMode, seed: u64, scores: &mut HighScores) {
    let mut config = RoundConfig::new(mode, settings.difficulty, seed);
    config.volume = settings.volume;

    let mut state = match GameState::new(config, &PlaceholderAssets) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start round: {}", e);
            return;
        }
    };

    let mut reports: Vec<ScoreReport> = Vec::new();
    let mut bonuses = 0;
    let mut t = 0.0;
    while !state.is_over() && t < MAX_ROUND_SECONDS {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_DT, &mut reports);
        bonuses += state
            .events
            .iter()
            .filter(|e| matches!(e, RoundEvent::BonusCollected { .. }))
            .count();
        t += FRAME_DT;
    }

    let hud = state.hud();
    println!(
        "{:>5} mode: score {:>4}  enemies {:>3}  bonuses {:>3}  ({:.1}s)",
        mode.as_str(),
        hud.score,
        hud.enemies,
        bonuses,
        hud.elapsed
    );

    for report in reports {
        if let Some(rank) = scores.add_score(report.mode, report.difficulty, "Autopilot", report.score)
        {
            state.high_score_reached(rank);
            for event in &state.events {
                if let RoundEvent::PlaySound { sound, volume } = event {
                    log::info!("Play {:?} at volume {:.2}", sound, volume);
                }
            }
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Collision (headless) starting...");

    let settings = Settings::load_or_default(std::env::var("COLLISION_SETTINGS").ok().as_deref());
    let seed = std::env::var("COLLISION_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC011_1510_u64);

    let mut scores = HighScores::new();
    for (i, mode) in GameMode::ALL.into_iter().enumerate() {
        play_round(&settings, mode, seed.wrapping_add(i as u64), &mut scores);
    }

    println!("\nHigh scores ({}):", settings.difficulty.as_str());
    for mode in GameMode::ALL {
        for (rank, entry) in scores.scores(mode, settings.difficulty).iter().enumerate() {
            println!(
                "  {:>5} #{} {:>4}  {}",
                mode.as_str(),
                rank + 1,
                entry.score,
                entry.name
            );
        }
    }
}
