//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in arena coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

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

/// Segment count that keeps circles smooth without wasting vertices
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(8, 48)
}

/// Filled axis-aligned rectangle from `min` to `max`
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle outline drawn inward from the given bounds
pub fn rect_outline(min: Vec2, max: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness;
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the full width; sides fill between them
    vertices.extend(rect(min, Vec2::new(max.x, min.y + t), color));
    vertices.extend(rect(Vec2::new(min.x, max.y - t), max, color));
    vertices.extend(rect(
        Vec2::new(min.x, min.y + t),
        Vec2::new(min.x + t, max.y - t),
        color,
    ));
    vertices.extend(rect(
        Vec2::new(max.x - t, min.y + t),
        Vec2::new(max.x, max.y - t),
        color,
    ));
    vertices
}

/// Isosceles ship triangle inside a `size` square, nose along `angle`
pub fn ship_triangle(center: Vec2, size: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let forward = Vec2::new(angle.cos(), angle.sin());
    let side = Vec2::new(-forward.y, forward.x);
    let half = size / 2.0;

    let nose = center + forward * half;
    let tail = center - forward * half;
    let left = tail + side * half;
    let right = tail - side * half;

    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(left.x, left.y, color),
        Vertex::new(right.x, right.y, color),
    ]
}
