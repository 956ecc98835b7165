//! Per-frame simulation step
//!
//! Runs the systems in a fixed order: movement, pursuit, spawning, firing,
//! projectile flight, collisions, pickups, progression.

use glam::Vec2;

use super::clock::clamp_delta;
use super::collision::{absorb_pickups, apply_contact_damage, resolve_projectile_hits};
use super::input::Directions;
use super::movement::{move_player, pursue};
use super::progression::{check_level_up, choose};
use super::spawner::update_spawner;
use super::state::{GamePhase, GameState, LevelUpChoice};
use super::weapons::{advance_projectiles, fire_weapons, nearest_enemy};

/// Autopilot runs from enemies closer than this (px)
const AUTOPILOT_DANGER_RADIUS: f32 = 200.0;

/// Input commands for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directions
    pub directions: Directions,
    /// Leave the Ready screen
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Resolve a pending level-up with this option
    pub choose: Option<usize>,
    /// Demo mode - the simulation steers itself
    pub autopilot: bool,
}

/// Advance the game state by `dt_ms` of game time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    let mut input = input.clone();
    if input.autopilot {
        drive_autopilot(state, &mut input);
    }

    if input.start && state.phase == GamePhase::Ready {
        state.phase = GamePhase::Running;
        log::info!("Run started (seed {})", state.seed);
    }

    if let (GamePhase::LevelingUp, Some(index)) = (state.phase, input.choose) {
        if let Err(err) = choose(state, index) {
            log::warn!("Level-up choice rejected: {}", err);
        }
    }

    // The world only moves while running
    if state.phase != GamePhase::Running {
        return;
    }

    // Callers that bypass FrameClock still get the stall clamp
    let dt = clamp_delta(dt_ms);
    state.game_time += dt;

    let bounds = state.bounds;
    move_player(&mut state.player, input.directions, &bounds, dt);
    pursue(&mut state.enemies, state.player.pos, dt);
    update_spawner(state, dt);

    fire_weapons(state);
    advance_projectiles(state, dt);

    resolve_projectile_hits(state);
    apply_contact_damage(state, dt);
    absorb_pickups(state);

    if state.player.health <= 0.0 {
        state.phase = GamePhase::GameOver;
        state.level_up_options.clear();
        log::info!(
            "Game over at {:.1}s - level {}, score {}, kills {}",
            state.game_time / 1000.0,
            state.player.level,
            state.score,
            state.kills
        );
        return;
    }

    check_level_up(state);
}

/// Fill in commands for demo mode: start the run, pick a level-up option,
/// flee close enemies and otherwise collect pickups.
fn drive_autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Ready => input.start = true,
        GamePhase::LevelingUp if input.choose.is_none() => {
            input.choose = Some(autopilot_choice(state))
        }
        _ => {}
    }

    let pos = state.player.pos;
    let threat = nearest_enemy(&state.enemies, pos)
        .filter(|e| e.pos.distance(pos) < AUTOPILOT_DANGER_RADIUS);

    let heading = if let Some(enemy) = threat {
        let mut away = pos - enemy.pos;
        // Pinned against a wall: slide toward the middle instead
        if away.length_squared() <= f32::EPSILON {
            away = state.bounds.center() - pos;
        }
        away + (state.bounds.center() - pos) * 0.25
    } else {
        state
            .pickups
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .partial_cmp(&b.pos.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.pos - pos)
            .unwrap_or(Vec2::ZERO)
    };

    input.directions = directions_toward(heading);
}

/// Prefer unlocking a new weapon, otherwise take the first option
fn autopilot_choice(state: &GameState) -> usize {
    state
        .level_up_options
        .iter()
        .position(|opt| matches!(opt.choice, LevelUpChoice::NewWeapon(_)))
        .unwrap_or(0)
}

/// Quantize a heading into held directions (8-way)
fn directions_toward(heading: Vec2) -> Directions {
    let dir = heading.normalize_or_zero();
    const DEADZONE: f32 = 0.38;
    Directions {
        up: dir.y < -DEADZONE,
        down: dir.y > DEADZONE,
        left: dir.x < -DEADZONE,
        right: dir.x > DEADZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{
        Bounds, Enemy, EnemyKind, LevelUpOption, Pickup, PickupKind, WeaponKind,
    };
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(12345, Bounds::new(800.0, 600.0), Tuning::default())
    }

    fn start(state: &mut GameState) {
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(state, &input, 0.0);
    }

    #[test]
    fn test_ready_waits_for_start() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.game_time, 0.0);
        assert!(state.enemies.is_empty());

        start(&mut state);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_pause_freezes_time_and_cooldowns() {
        let mut state = new_state();
        start(&mut state);
        tick(&mut state, &TickInput::default(), 16.0);
        let time = state.game_time;
        let enemies = state.enemies.len();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 16.0);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 16.0);
        }
        assert_eq!(state.game_time, time);
        assert_eq!(state.enemies.len(), enemies);

        tick(&mut state, &pause, 16.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.game_time, time + 16.0);
    }

    #[test]
    fn test_empty_board_spawns_first_step() {
        let mut state = new_state();
        start(&mut state);
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_level_up_freezes_world_until_chosen() {
        let mut state = new_state();
        start(&mut state);
        let pos = state.player.pos;
        state.player.experience = 95;
        state.pickups.push(Pickup {
            id: 999,
            kind: PickupKind::Experience,
            pos,
            radius: 10.0,
            value: 10,
        });
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::LevelingUp);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.experience, 5);
        assert_eq!(state.level_up_options.len(), 3);

        let time = state.game_time;
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.game_time, time);

        let pick = TickInput {
            choose: Some(0),
            ..Default::default()
        };
        tick(&mut state, &pick, 16.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.game_time, time + 16.0);
    }

    #[test]
    fn test_game_over_stops_updates() {
        let mut state = new_state();
        start(&mut state);
        let pos = state.player.pos;
        state.player.health = 0.1;
        state.enemies.push(Enemy::new(500, EnemyKind::Tank, pos));
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let enemies: Vec<_> = state.enemies.iter().map(|e| (e.id, e.pos)).collect();
        let projectiles = state.projectiles.len();
        let score = state.score;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), 16.0);
        }
        let after: Vec<_> = state.enemies.iter().map(|e| (e.id, e.pos)).collect();
        assert_eq!(after, enemies);
        assert_eq!(state.projectiles.len(), projectiles);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_autopilot_starts_and_flees() {
        let mut state = new_state();
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(500, EnemyKind::Basic, pos + Vec2::new(100.0, 0.0)));
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &auto, 16.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.pos.x < pos.x);
    }

    #[test]
    fn test_stall_sized_delta_is_clamped() {
        let mut state = new_state();
        start(&mut state);
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(500, EnemyKind::Tank, pos));
        tick(&mut state, &TickInput::default(), 10_000.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.game_time, 16.0);
        let expected = 100.0 - EnemyKind::Tank.stats().damage * 16.0 / 1000.0;
        assert!((state.player.health - expected).abs() < 1e-3);
    }

    #[test]
    fn test_autopilot_prefers_new_weapon() {
        let mut state = new_state();
        start(&mut state);
        state.phase = GamePhase::LevelingUp;
        state.level_up_options = vec![
            LevelUpOption::new(LevelUpChoice::Upgrade(WeaponKind::Basic)),
            LevelUpOption::new(LevelUpChoice::NewWeapon(WeaponKind::Spread)),
            LevelUpOption::new(LevelUpChoice::HealthBoost),
        ];
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &auto, 16.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.owns(WeaponKind::Spread));
        assert_eq!(state.weapons[0].level, 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut a = new_state();
        let mut b = new_state();
        for _ in 0..600 {
            tick(&mut a, &auto, 16.0);
            tick(&mut b, &auto, 16.0);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.weapons.len(), b.weapons.len());
    }
}
