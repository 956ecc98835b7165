//! Collision detection and resolution
//!
//! All tests are axis-aligned boxes except pickup absorption, which is a radius
//! check. Scans run in reverse index order so removal never skips an element.

use glam::Vec2;

use super::state::{GameState, Pickup, PickupKind};

/// Overlap of two boxes given by center and half-extents
#[inline]
pub fn overlaps(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let d = (a_pos - b_pos).abs();
    d.x < a_half.x + b_half.x && d.y < a_half.y + b_half.y
}

/// Summary of one projectile pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    pub hits: u32,
    pub kills: u32,
    pub experience_dropped: u32,
}

/// Resolve projectile-vs-enemy hits.
///
/// Projectile-major, enemy-minor, both in reverse. A non-piercing shot is
/// consumed by its first hit; a piercing shot damages every enemy it overlaps.
/// Each kill drops one experience pickup worth the enemy's value and scores it.
pub fn resolve_projectile_hits(state: &mut GameState) -> HitReport {
    let mut report = HitReport::default();
    let pickup_radius = state.tuning.pickup_radius;

    let mut pi = state.projectiles.len();
    while pi > 0 {
        pi -= 1;
        let shot_pos = state.projectiles[pi].pos;
        let shot_half = Vec2::splat(state.projectiles[pi].radius);
        let damage = state.projectiles[pi].damage;
        let pierces = state.projectiles[pi].kind.pierces();

        let mut ei = state.enemies.len();
        while ei > 0 {
            ei -= 1;
            let enemy = &mut state.enemies[ei];
            if !overlaps(shot_pos, shot_half, enemy.pos, enemy.half_size()) {
                continue;
            }
            enemy.health -= damage;
            report.hits += 1;

            if enemy.health <= 0.0 {
                let dead = state.enemies.remove(ei);
                let id = state.next_entity_id();
                state.pickups.push(Pickup {
                    id,
                    kind: PickupKind::Experience,
                    pos: dead.pos,
                    radius: pickup_radius,
                    value: dead.experience_value,
                });
                state.score += u64::from(dead.experience_value);
                state.kills += 1;
                report.kills += 1;
                report.experience_dropped += dead.experience_value;
            }

            if !pierces {
                state.projectiles.remove(pi);
                break;
            }
        }
    }
    report
}

/// Continuous contact damage: every overlapping enemy drains `damage` per second.
/// Returns the health lost this step.
pub fn apply_contact_damage(state: &mut GameState, dt_ms: f32) -> f32 {
    let player_pos = state.player.pos;
    let player_half = state.player.half_size();
    let seconds = dt_ms / 1000.0;
    let total: f32 = state
        .enemies
        .iter()
        .filter(|e| overlaps(player_pos, player_half, e.pos, e.half_size()))
        .map(|e| e.damage * seconds)
        .sum();
    state.player.health -= total;
    total
}

/// Pickups within reach are absorbed. Returns the experience gained.
pub fn absorb_pickups(state: &mut GameState) -> u32 {
    let reach_base = state.player.half_size().x + state.tuning.pickup_absorb_bonus;
    let player_pos = state.player.pos;
    let mut gained = 0;
    let mut i = state.pickups.len();
    while i > 0 {
        i -= 1;
        let pickup = &state.pickups[i];
        if pickup.pos.distance(player_pos) < reach_base + pickup.radius {
            let pickup = state.pickups.remove(i);
            match pickup.kind {
                PickupKind::Experience => gained += pickup.value,
            }
        }
    }
    state.player.experience += gained;
    gained
}
