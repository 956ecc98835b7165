//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4], out: &mut Vec<Vertex>) {
    // a-b-c-d clockwise or counter-clockwise, two triangles
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Filled axis-aligned rectangle from its top-left corner and size
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let max = min + size;
    quad(
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
        &mut vertices,
    );
    vertices
}

/// Filled rectangle from its center and half-extents
pub fn centered_rect(center: Vec2, half: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rect(center - half, half * 2.0, color)
}

/// Rectangle border of `thickness` drawn inside the box
pub fn rect_outline(center: Vec2, half: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(half.x).min(half.y);
    let min = center - half;
    let size = half * 2.0;
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Thick line segment; degenerate segments produce nothing
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    quad(from + perp, to + perp, to - perp, from - perp, color, &mut vertices);
    vertices
}

/// Tapered trail from `head` back to `tail`, fading out toward the tail
pub fn trail(head: Vec2, tail: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (head - tail).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let faded = [color[0], color[1], color[2], 0.0];
    vec![
        Vertex::new(head.x + perp.x, head.y + perp.y, color),
        Vertex::new(head.x - perp.x, head.y - perp.y, color),
        Vertex::new(tail.x, tail.y, faded),
    ]
}

/// Progress bar: background plus a fill proportional to `fraction` (clamped to [0, 1])
pub fn bar(
    min: Vec2,
    size: Vec2,
    fraction: f32,
    background: [f32; 4],
    fill: [f32; 4],
) -> Vec<Vertex> {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let mut vertices = rect(min, size, background);
    if fraction > 0.0 {
        vertices.extend(rect(min, Vec2::new(size.x * fraction, size.y), fill));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), WHITE);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_bar_fill_clamped() {
        let full = bar(Vec2::ZERO, Vec2::new(200.0, 10.0), 1.7, WHITE, WHITE);
        assert_eq!(full.len(), 12);
        let max_x = full[6..].iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 200.0);

        // Negative health draws only the background
        let empty = bar(Vec2::ZERO, Vec2::new(200.0, 10.0), -0.3, WHITE, WHITE);
        assert_eq!(empty.len(), 6);
    }

    #[test]
    fn test_circle_segments() {
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 12).len(), 36);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 2.0, WHITE).len(), 6);
    }
}
