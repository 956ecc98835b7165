//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep supplied by the caller, already clamped
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod movement;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use clock::{FrameClock, clamp_delta};
pub use collision::{HitReport, absorb_pickups, apply_contact_damage, overlaps, resolve_projectile_hits};
pub use input::{Direction, Directions, InputState, KeyBindings};
pub use movement::{move_player, pursue};
pub use progression::{ChoiceError, check_level_up, choose, generate_options};
pub use spawner::{spawn_interval, unlocked_kinds, update_spawner};
pub use state::{
    Bounds, Enemy, EnemyKind, GamePhase, GameState, LevelUpChoice, LevelUpOption, OptionIcon,
    Pickup, PickupKind, Player, Projectile, Weapon, WeaponKind, experience_threshold,
};
pub use tick::{TickInput, tick};
pub use weapons::{advance_projectiles, fire_weapons, nearest_enemy};
