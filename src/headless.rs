//! Headless autopilot runs
//!
//! Drives the simulation without a window at the nominal frame rate. Used by
//! the native binary and by tests.

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_MS;
use crate::sim::{Bounds, FrameClock, GamePhase, GameState, TickInput, WeaponKind, tick};
use crate::tuning::Tuning;

/// Owned weapon in a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSummary {
    pub kind: WeaponKind,
    pub level: u32,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub phase: GamePhase,
    pub time_seconds: f32,
    pub level: u32,
    pub score: u64,
    pub kills: u32,
    pub weapons: Vec<WeaponSummary>,
}

impl RunSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            seed: state.seed,
            phase: state.phase,
            time_seconds: state.game_time / 1000.0,
            level: state.player.level,
            score: state.score,
            kills: state.kills,
            weapons: state
                .weapons
                .iter()
                .map(|w| WeaponSummary {
                    kind: w.kind,
                    level: w.level,
                })
                .collect(),
        }
    }
}

/// Run up to `frames` autopilot frames, stopping early on game over
pub fn run_autopilot(seed: u64, bounds: Bounds, tuning: Tuning, frames: u32) -> GameState {
    let mut state = GameState::new(seed, bounds, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut clock = FrameClock::new();
    let mut now = 0.0;
    clock.start(now);
    for _ in 0..frames {
        now += f64::from(FRAME_MS);
        let Some(dt) = clock.advance(now) else {
            break;
        };
        tick(&mut state, &input, dt);
        if state.is_over() {
            clock.stop();
            break;
        }
    }
    state
}
