//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::{EnemyKind, WeaponKind};

    /// 0xRRGGBB to linear-ish RGBA floats
    pub const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const BACKGROUND: [f32; 4] = rgb(0x1a1a2e);
    pub const GRID: [f32; 4] = [1.0, 1.0, 1.0, 0.06];
    pub const TARGET_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.15];
    pub const PLAYER: [f32; 4] = rgb(0x4caf50);
    pub const OUTLINE: [f32; 4] = rgb(0xffffff);
    pub const PICKUP: [f32; 4] = rgb(0xffff00);
    pub const BAR_BACKGROUND: [f32; 4] = rgb(0x333333);
    pub const EXPERIENCE_BAR: [f32; 4] = rgb(0x2ed573);
    pub const HEALTH_BAR: [f32; 4] = rgb(0xff4757);

    pub const fn enemy(kind: EnemyKind) -> [f32; 4] {
        match kind {
            EnemyKind::Basic => rgb(0xff0000),
            EnemyKind::Fast => rgb(0x00ffff),
            EnemyKind::Tank => rgb(0xff9900),
        }
    }

    pub const fn projectile(kind: WeaponKind) -> [f32; 4] {
        match kind {
            WeaponKind::Basic => rgb(0xffa502),
            WeaponKind::Spread => rgb(0x1e90ff),
            WeaponKind::Piercing => rgb(0xf368e0),
            WeaponKind::Homing => rgb(0x2ed573),
            WeaponKind::Explosive => rgb(0xff4757),
        }
    }
}
