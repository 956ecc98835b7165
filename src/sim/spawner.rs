//! Enemy spawning
//!
//! The rate steps up once per ramp period until it saturates, and new enemy
//! types join the pool as game time passes.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameState};
use crate::tuning::SpawnTuning;

/// Milliseconds between spawns at game time `t`
pub fn spawn_interval(tuning: &SpawnTuning, game_time: f32) -> f32 {
    let steps = (game_time.max(0.0) / tuning.ramp_period_ms).floor() as u32;
    let per_second = steps.saturating_add(1).min(tuning.max_spawns_per_second);
    tuning.base_interval_ms / per_second as f32
}

/// Enemy types available at game time `t`, in unlock order
pub fn unlocked_kinds(tuning: &SpawnTuning, game_time: f32) -> Vec<EnemyKind> {
    let mut kinds = vec![EnemyKind::Basic];
    if game_time > tuning.fast_unlock_ms {
        kinds.push(EnemyKind::Fast);
    }
    if game_time > tuning.tank_unlock_ms {
        kinds.push(EnemyKind::Tank);
    }
    kinds
}

/// Screen edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Position just outside `edge`, `along` being the coordinate on that edge
pub fn edge_position(edge: Edge, along: f32, width: f32, height: f32, offset: f32) -> Vec2 {
    match edge {
        Edge::Top => Vec2::new(along, -offset),
        Edge::Right => Vec2::new(width + offset, along),
        Edge::Bottom => Vec2::new(along, height + offset),
        Edge::Left => Vec2::new(-offset, along),
    }
}

/// Advance the spawn timer and create at most one enemy.
/// An empty board always gets a spawn. Returns the new enemy's id.
pub fn update_spawner(state: &mut GameState, dt_ms: f32) -> Option<u32> {
    state.spawn_timer += dt_ms;
    let interval = spawn_interval(&state.tuning.spawn, state.game_time);
    if state.spawn_timer < interval && !state.enemies.is_empty() {
        return None;
    }
    state.spawn_timer = 0.0;

    let kinds = unlocked_kinds(&state.tuning.spawn, state.game_time);
    let kind = kinds[state.rng.random_range(0..kinds.len())];
    let edge = Edge::ALL[state.rng.random_range(0..Edge::ALL.len())];
    let (width, height) = (state.bounds.width, state.bounds.height);
    let span = match edge {
        Edge::Top | Edge::Bottom => width,
        Edge::Left | Edge::Right => height,
    };
    let along = state.rng.random_range(0.0..span.max(1.0));
    let pos = edge_position(edge, along, width, height, state.tuning.spawn.edge_offset);

    let id = state.next_entity_id();
    log::debug!("spawn {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    state.enemies.push(Enemy::new(id, kind, pos));
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bounds;
    use crate::tuning::Tuning;

    #[test]
    fn test_interval_steps_and_saturates() {
        let tuning = SpawnTuning::default();
        assert_eq!(spawn_interval(&tuning, 0.0), 1000.0);
        assert_eq!(spawn_interval(&tuning, 9_999.0), 1000.0);
        assert_eq!(spawn_interval(&tuning, 10_000.0), 500.0);
        assert!((spawn_interval(&tuning, 25_000.0) - 333.333).abs() < 0.01);
        assert!((spawn_interval(&tuning, 600_000.0) - 333.333).abs() < 0.01);
    }

    #[test]
    fn test_type_unlocks() {
        let tuning = SpawnTuning::default();
        assert_eq!(unlocked_kinds(&tuning, 60_000.0), vec![EnemyKind::Basic]);
        assert_eq!(unlocked_kinds(&tuning, 60_001.0), vec![EnemyKind::Basic, EnemyKind::Fast]);
        assert_eq!(unlocked_kinds(&tuning, 130_000.0).len(), 3);
    }

    #[test]
    fn test_empty_board_forces_spawn() {
        let mut state = GameState::new(3, Bounds::new(800.0, 600.0), Tuning::default());
        assert!(update_spawner(&mut state, 0.0).is_some());
        assert_eq!(state.enemies.len(), 1);
        // Timer not elapsed and board not empty
        assert!(update_spawner(&mut state, 16.0).is_none());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_spawn_outside_edge() {
        let mut state = GameState::new(11, Bounds::new(800.0, 600.0), Tuning::default());
        for _ in 0..50 {
            state.enemies.clear();
            update_spawner(&mut state, 0.0);
            let pos = state.enemies[0].pos;
            let outside = pos.x == -100.0 || pos.x == 900.0 || pos.y == -100.0 || pos.y == 700.0;
            assert!(outside, "spawned at {pos:?}");
            assert_eq!(state.enemies[0].kind, EnemyKind::Basic);
        }
    }

    #[test]
    fn test_timer_spawns_on_interval() {
        let mut state = GameState::new(5, Bounds::new(800.0, 600.0), Tuning::default());
        update_spawner(&mut state, 0.0);
        let mut spawned = 0;
        for _ in 0..62 {
            if update_spawner(&mut state, 16.0).is_some() {
                spawned += 1;
            }
        }
        // 992 ms elapsed: not yet
        assert_eq!(spawned, 0);
        assert!(update_spawner(&mut state, 16.0).is_some());
    }
}
