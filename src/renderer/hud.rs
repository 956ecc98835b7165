//! HUD text formatting
//!
//! The bars are drawn on the GPU; the numbers go into DOM elements.

use crate::sim::{GamePhase, GameState, OptionIcon};

/// Elapsed game time as `m:ss`
pub fn format_clock(game_time_ms: f32) -> String {
    let total = (game_time_ms.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// `health / max`, rounded up and never below zero
pub fn format_health(health: f32, max_health: f32) -> String {
    format!("{} / {}", health.max(0.0).ceil() as u32, max_health.ceil() as u32)
}

/// Glyph shown beside a level-up option
pub fn option_glyph(icon: OptionIcon) -> &'static str {
    match icon {
        OptionIcon::Upgrade => "\u{2b06}\u{fe0f}",
        OptionIcon::Weapon => "\u{1f52b}",
        OptionIcon::Heart => "\u{2764}\u{fe0f}",
    }
}

/// DOM ids of the full-screen overlays
pub const OVERLAY_IDS: [&str; 4] = ["start-prompt", "pause-menu", "level-up", "game-over"];

/// The overlay shown in `phase`; none while running
pub fn overlay_for(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Ready => Some("start-prompt"),
        GamePhase::Paused => Some("pause-menu"),
        GamePhase::LevelingUp => Some("level-up"),
        GamePhase::GameOver => Some("game-over"),
        GamePhase::Running => None,
    }
}

/// Text values shown in the HUD for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub level: String,
    pub score: String,
    pub time: String,
    pub health: String,
    pub phase: GamePhase,
}

impl HudText {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            level: state.player.level.to_string(),
            score: state.score.to_string(),
            time: format_clock(state.game_time),
            health: format_health(state.player.health, state.player.max_health),
            phase: state.phase,
        }
    }
}
