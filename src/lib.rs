//! Survivor Arena - survive the horde in a rectangular arena
//!
//! Core modules:
//! - `sim`: Seeded simulation (movement, spawning, weapons, collisions, progression)
//! - `renderer`: WebGPU rendering pipeline and scene building
//! - `platform`: Browser frame scheduling and key mapping
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences
//! - `headless`: Windowless autopilot runs

pub mod headless;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use headless::{RunSummary, run_autopilot};
pub use settings::{ControllerMode, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame length (ms). Speeds are expressed in pixels per nominal frame.
    pub const FRAME_MS: f32 = 16.0;
    /// Frame deltas above this (ms) are treated as a stall and replaced by `FRAME_MS`
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Weapon levels never exceed this
    pub const MAX_WEAPON_LEVEL: u32 = 5;
    /// Options offered per level-up
    pub const LEVEL_UP_OPTION_COUNT: usize = 3;
    /// Experience needed to reach level 2
    pub const BASE_EXPERIENCE_THRESHOLD: f64 = 100.0;
    /// Geometric growth of the experience threshold per level
    pub const EXPERIENCE_GROWTH: f64 = 1.2;

    /// Damage multiplier per weapon upgrade
    pub const UPGRADE_DAMAGE_FACTOR: f32 = 1.2;
    /// Fire interval multiplier per weapon upgrade
    pub const UPGRADE_FIRE_RATE_FACTOR: f32 = 0.9;
    /// Extra projectiles per spread upgrade
    pub const SPREAD_UPGRADE_COUNT: u32 = 1;
    /// Extra spread angle (degrees) per spread upgrade
    pub const SPREAD_UPGRADE_DEGREES: f32 = 5.0;

    /// How far along the firing angle the aim point is projected
    pub const AIM_DISTANCE: f32 = 1000.0;
    /// Default target offset above the player when no enemy exists
    pub const DEFAULT_AIM_OFFSET: f32 = 100.0;
    /// Projectiles are culled once this far outside the play area
    pub const PROJECTILE_CULL_MARGIN: f32 = 100.0;
}

/// Scale factor turning a per-frame speed into a displacement for `dt_ms`
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}
