//! Weapon firing and projectile flight
//!
//! Every shot captures its aim point at launch and flies straight at it; homing
//! shots included. Cooldowns compare against game time, so pausing freezes them.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameState, Projectile, WeaponKind};
use crate::consts::{AIM_DISTANCE, DEFAULT_AIM_OFFSET, PROJECTILE_CULL_MARGIN};
use crate::frame_scale;

/// Nearest enemy by straight-line distance; the first minimum wins ties
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<&Enemy> {
    let mut best: Option<(&Enemy, f32)> = None;
    for enemy in enemies {
        let d = enemy.pos.distance_squared(from);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((enemy, d)),
        }
    }
    best.map(|(enemy, _)| enemy)
}

/// Where a volley is aimed: the nearest enemy, or straight up when the board is empty
pub fn target_point(enemies: &[Enemy], from: Vec2) -> Vec2 {
    nearest_enemy(enemies, from)
        .map(|e| e.pos)
        .unwrap_or(from - Vec2::new(0.0, DEFAULT_AIM_OFFSET))
}

/// Aim point for a shot leaving `from` at `angle` radians
#[inline]
pub fn aim_point(from: Vec2, angle: f32) -> Vec2 {
    from + Vec2::from_angle(angle) * AIM_DISTANCE
}

struct Shot {
    kind: WeaponKind,
    aim: Vec2,
    speed: f32,
    damage: f32,
}

/// Fire every weapon whose cooldown has elapsed. Returns the number of projectiles created.
pub fn fire_weapons(state: &mut GameState) -> usize {
    let origin = state.player.pos;
    let now = state.game_time;
    let target = target_point(&state.enemies, origin);
    let base_angle = (target - origin).to_angle();

    let mut shots = Vec::new();
    let GameState { weapons, rng, .. } = state;
    for weapon in weapons.iter_mut().filter(|w| w.ready(now)) {
        for _ in 0..weapon.projectile_count {
            let mut angle = base_angle;
            if weapon.spread_degrees > 0.0 {
                angle += (rng.random::<f32>() - 0.5) * weapon.spread_degrees.to_radians();
            }
            shots.push(Shot {
                kind: weapon.kind,
                aim: aim_point(origin, angle),
                speed: weapon.speed,
                damage: weapon.damage,
            });
        }
        weapon.last_fired = now;
    }

    let fired = shots.len();
    let radius = state.tuning.projectile_radius;
    for shot in shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            kind: shot.kind,
            pos: origin,
            aim: shot.aim,
            speed: shot.speed,
            damage: shot.damage,
            radius,
        });
    }
    fired
}

/// Move projectiles toward their aim points. Shots that arrive, or that leave
/// the play area grown by the cull margin, are removed.
pub fn advance_projectiles(state: &mut GameState, dt_ms: f32) {
    let bounds = state.bounds;
    let scale = frame_scale(dt_ms);
    state.projectiles.retain_mut(|p| {
        let to_aim = p.aim - p.pos;
        let dist = to_aim.length();
        let step = p.speed * scale;
        if dist <= step {
            return false;
        }
        p.pos += to_aim / dist * step;
        bounds.contains_with_margin(p.pos, PROJECTILE_CULL_MARGIN)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bounds, EnemyKind, Weapon};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(42, Bounds::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_nearest_enemy_first_wins_ties() {
        let enemies = vec![
            Enemy::new(1, EnemyKind::Basic, Vec2::new(10.0, 0.0)),
            Enemy::new(2, EnemyKind::Basic, Vec2::new(-10.0, 0.0)),
            Enemy::new(3, EnemyKind::Basic, Vec2::new(50.0, 0.0)),
        ];
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO).map(|e| e.id), Some(1));
        assert!(nearest_enemy(&[], Vec2::ZERO).is_none());
    }

    #[test]
    fn test_default_aim_is_straight_up() {
        let mut state = state();
        state.game_time = 500.0;
        assert_eq!(fire_weapons(&mut state), 1);
        let shot = &state.projectiles[0];
        assert_eq!(shot.pos, Vec2::new(400.0, 300.0));
        assert!((shot.aim - Vec2::new(400.0, -700.0)).length() < 1e-2);
        assert_eq!(state.weapons[0].last_fired, 500.0);
    }

    #[test]
    fn test_cooldown_respected() {
        let mut state = state();
        state.game_time = 499.0;
        assert_eq!(fire_weapons(&mut state), 0);
        state.game_time = 500.0;
        assert_eq!(fire_weapons(&mut state), 1);
        state.game_time = 999.0;
        assert_eq!(fire_weapons(&mut state), 0);
    }

    #[test]
    fn test_aims_at_nearest_enemy() {
        let mut state = state();
        state.enemies.push(Enemy::new(9, EnemyKind::Basic, Vec2::new(600.0, 300.0)));
        state.enemies.push(Enemy::new(10, EnemyKind::Basic, Vec2::new(400.0, 900.0)));
        state.game_time = 500.0;
        fire_weapons(&mut state);
        assert!((state.projectiles[0].aim - Vec2::new(1400.0, 300.0)).length() < 1e-2);
    }

    #[test]
    fn test_spread_volley_stays_within_cone() {
        let mut state = state();
        state.weapons.push(Weapon::new(WeaponKind::Spread));
        state.game_time = 800.0;
        assert_eq!(fire_weapons(&mut state), 4);
        let half_cone = 15f32.to_radians() + 1e-4;
        let up = -std::f32::consts::FRAC_PI_2;
        for shot in state.projectiles.iter().filter(|p| p.kind == WeaponKind::Spread) {
            let angle = (shot.aim - shot.pos).to_angle();
            assert!((angle - up).abs() <= half_cone);
            assert_eq!(shot.damage, 5.0);
        }
    }

    #[test]
    fn test_projectiles_fly_and_cull() {
        let mut state = state();
        state.game_time = 500.0;
        fire_weapons(&mut state);
        advance_projectiles(&mut state, 16.0);
        assert_eq!(state.projectiles[0].pos, Vec2::new(400.0, 292.0));
        // 300 px to the top edge plus the 100 px margin at 8 px a frame
        for _ in 0..60 {
            advance_projectiles(&mut state, 16.0);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_retired_at_aim_point() {
        let mut state = state();
        state.projectiles.push(Projectile {
            id: 1,
            kind: WeaponKind::Basic,
            pos: Vec2::new(100.0, 100.0),
            aim: Vec2::new(104.0, 100.0),
            speed: 8.0,
            damage: 10.0,
            radius: 8.0,
        });
        advance_projectiles(&mut state, 16.0);
        assert!(state.projectiles.is_empty());
    }
}
