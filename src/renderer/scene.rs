//! Scene building
//!
//! Turns a read-only view of the game state into one vertex list in pixel
//! coordinates. Draw order: overlay, enemies, projectiles, player, pickups, HUD.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Bounds, Enemy, GameState, Player, Projectile};

const GRID_SPACING: f32 = 50.0;
const OUTLINE_WIDTH: f32 = 2.0;
const CIRCLE_SEGMENTS: u32 = 16;

/// Experience bar geometry (top center)
pub const EXPERIENCE_BAR_SIZE: Vec2 = Vec2::new(300.0, 10.0);
const EXPERIENCE_BAR_TOP: f32 = 20.0;
/// Health bar geometry (bottom center)
pub const HEALTH_BAR_SIZE: Vec2 = Vec2::new(200.0, 10.0);
const HEALTH_BAR_BOTTOM_OFFSET: f32 = 30.0;

/// Build every vertex for one frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        256 + state.enemies.len() * 60 + state.projectiles.len() * 51 + state.pickups.len() * 48,
    );

    if settings.show_debug_overlay {
        vertices.extend(grid(&state.bounds));
        for enemy in &state.enemies {
            vertices.extend(shapes::line(state.player.pos, enemy.pos, 1.0, colors::TARGET_LINE));
        }
    }

    for enemy in &state.enemies {
        vertices.extend(enemy_shape(enemy, settings.enemy_health_bars));
    }

    for projectile in &state.projectiles {
        vertices.extend(projectile_shape(projectile, settings.projectile_trails));
    }

    vertices.extend(player_shape(&state.player));

    for pickup in &state.pickups {
        vertices.extend(shapes::circle(pickup.pos, pickup.radius, colors::PICKUP, CIRCLE_SEGMENTS));
    }

    vertices.extend(hud_bars(&state.player, &state.bounds));
    vertices
}

fn grid(bounds: &Bounds) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut x = GRID_SPACING;
    while x < bounds.width {
        vertices.extend(shapes::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, bounds.height),
            1.0,
            colors::GRID,
        ));
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < bounds.height {
        vertices.extend(shapes::line(
            Vec2::new(0.0, y),
            Vec2::new(bounds.width, y),
            1.0,
            colors::GRID,
        ));
        y += GRID_SPACING;
    }
    vertices
}

fn enemy_shape(enemy: &Enemy, health_bar: bool) -> Vec<Vertex> {
    let half = enemy.half_size();
    let mut vertices = shapes::centered_rect(enemy.pos, half, colors::enemy(enemy.kind));
    vertices.extend(shapes::rect_outline(
        enemy.pos,
        half,
        OUTLINE_WIDTH,
        colors::with_alpha(colors::OUTLINE, 0.5),
    ));

    // Only damaged enemies get a bar
    if health_bar && enemy.health < enemy.max_health {
        let min = enemy.pos - Vec2::new(half.x, half.y + 8.0);
        vertices.extend(shapes::bar(
            min,
            Vec2::new(enemy.size.x, 4.0),
            enemy.health_fraction(),
            colors::BAR_BACKGROUND,
            colors::HEALTH_BAR,
        ));
    }
    vertices
}

fn projectile_shape(projectile: &Projectile, with_trail: bool) -> Vec<Vertex> {
    let color = colors::projectile(projectile.kind);
    let mut vertices = Vec::new();
    if with_trail {
        let tail = projectile.pos - projectile.heading() * projectile.radius * 4.0;
        vertices.extend(shapes::trail(
            projectile.pos,
            tail,
            projectile.radius * 2.0,
            colors::with_alpha(color, 0.6),
        ));
    }
    vertices.extend(shapes::circle(
        projectile.pos,
        projectile.radius * 2.0,
        color,
        CIRCLE_SEGMENTS,
    ));
    vertices
}

fn player_shape(player: &Player) -> Vec<Vertex> {
    let half = player.half_size();
    let mut vertices = shapes::centered_rect(player.pos, half, colors::PLAYER);
    vertices.extend(shapes::rect_outline(player.pos, half, OUTLINE_WIDTH, colors::OUTLINE));
    vertices
}

/// Top-left corners of the experience and health bars for this viewport
pub fn hud_bar_origins(bounds: &Bounds) -> (Vec2, Vec2) {
    let experience = Vec2::new((bounds.width - EXPERIENCE_BAR_SIZE.x) / 2.0, EXPERIENCE_BAR_TOP);
    let health = Vec2::new(
        (bounds.width - HEALTH_BAR_SIZE.x) / 2.0,
        bounds.height - HEALTH_BAR_BOTTOM_OFFSET,
    );
    (experience, health)
}

fn hud_bars(player: &Player, bounds: &Bounds) -> Vec<Vertex> {
    let (xp_min, health_min) = hud_bar_origins(bounds);
    let mut vertices = shapes::bar(
        xp_min,
        EXPERIENCE_BAR_SIZE,
        player.experience_fraction(),
        colors::BAR_BACKGROUND,
        colors::EXPERIENCE_BAR,
    );
    vertices.extend(shapes::bar(
        health_min,
        HEALTH_BAR_SIZE,
        player.health_fraction(),
        colors::BAR_BACKGROUND,
        colors::HEALTH_BAR,
    ));
    vertices
}
