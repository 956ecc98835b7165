//! Player movement and enemy pursuit

use glam::Vec2;

use super::input::Directions;
use super::state::{Bounds, Enemy, Player};
use crate::frame_scale;

/// Displacement of a mover at `speed` along `dir` over `dt_ms`.
/// Diagonals are renormalized so they are no faster than axis moves.
#[inline]
pub fn step_toward(dir: Vec2, speed: f32, dt_ms: f32) -> Vec2 {
    dir.normalize_or_zero() * speed * frame_scale(dt_ms)
}

/// Move the player from the held directions and keep it fully on screen
pub fn move_player(player: &mut Player, dirs: Directions, bounds: &Bounds, dt_ms: f32) {
    let delta = step_toward(dirs.axis(), player.speed, dt_ms);
    player.pos = bounds.clamp_box(player.pos + delta, player.half_size());
}

/// Pure pursuit: every enemy steps toward the player's current position.
/// The step never overshoots, and an enemy already on the target stays put.
pub fn pursue(enemies: &mut [Enemy], target: Vec2, dt_ms: f32) {
    for enemy in enemies.iter_mut() {
        let to_target = target - enemy.pos;
        let dist = to_target.length();
        if dist <= f32::EPSILON {
            continue;
        }
        let step = (enemy.speed * frame_scale(dt_ms)).min(dist);
        enemy.pos += to_target / dist * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &Tuning::default())
    }

    #[test]
    fn test_axis_move_one_frame() {
        let mut player = player_at(400.0, 300.0);
        let dirs = Directions {
            right: true,
            ..Default::default()
        };
        move_player(&mut player, dirs, &Bounds::new(800.0, 600.0), 16.0);
        assert_eq!(player.pos, Vec2::new(408.0, 300.0));
    }

    #[test]
    fn test_diagonal_not_faster() {
        let mut player = player_at(400.0, 300.0);
        let dirs = Directions {
            up: true,
            left: true,
            ..Default::default()
        };
        move_player(&mut player, dirs, &Bounds::new(800.0, 600.0), 16.0);
        let moved = player.pos.distance(Vec2::new(400.0, 300.0));
        assert!((moved - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_at_edge() {
        let mut player = player_at(35.0, 300.0);
        let dirs = Directions {
            left: true,
            ..Default::default()
        };
        move_player(&mut player, dirs, &Bounds::new(800.0, 600.0), 48.0);
        assert_eq!(player.pos.x, 30.0);
    }

    #[test]
    fn test_pursuit_moves_toward_target() {
        let mut enemies = vec![Enemy::new(1, EnemyKind::Basic, Vec2::new(0.0, 0.0))];
        pursue(&mut enemies, Vec2::new(30.0, 40.0), 16.0);
        // basic speed 2 per frame along (0.6, 0.8)
        assert!((enemies[0].pos - Vec2::new(1.2, 1.6)).length() < 1e-4);
    }

    #[test]
    fn test_pursuit_at_target_is_still() {
        let target = Vec2::new(100.0, 100.0);
        let mut enemies = vec![Enemy::new(1, EnemyKind::Fast, target)];
        pursue(&mut enemies, target, 16.0);
        assert_eq!(enemies[0].pos, target);
        assert!(enemies[0].pos.is_finite());
    }

    #[test]
    fn test_pursuit_does_not_overshoot() {
        let mut enemies = vec![Enemy::new(1, EnemyKind::Fast, Vec2::new(0.0, 0.0))];
        pursue(&mut enemies, Vec2::new(1.0, 0.0), 16.0);
        assert_eq!(enemies[0].pos, Vec2::new(1.0, 0.0));
    }
}
