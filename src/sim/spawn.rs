//! Asteroid spawning
//!
//! Asteroids appear just beyond one of the four arena edges and head for the
//! center with some angular jitter. All randomness comes from the arena's
//! seeded RNG so a seed fully determines the wave of rocks.

use glam::Vec2;
use rand::Rng;

use super::state::Arena;
use crate::{direction, heading};

/// Arena edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Center position one `radius` beyond this edge, at `along` on the edge
    pub fn spawn_point(self, along: f32, radius: f32, width: f32, height: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(along, -radius),
            Edge::Bottom => Vec2::new(along, height + radius),
            Edge::Left => Vec2::new(-radius, along),
            Edge::Right => Vec2::new(width + radius, along),
        }
    }

    /// Length of the edge
    pub fn span(self, width: f32, height: f32) -> f32 {
        match self {
            Edge::Top | Edge::Bottom => width,
            Edge::Left | Edge::Right => height,
        }
    }
}

/// Roll one asteroid and add it to the arena; returns its id
pub fn spawn_asteroid(arena: &mut Arena) -> u32 {
    let t = &arena.tuning;
    let (width, height) = (t.arena_width, t.arena_height);
    let (size_min, size_max) = (t.asteroid_size_min, t.asteroid_size_max);
    let (speed_min, speed_max) = (t.asteroid_speed_min, t.asteroid_speed_max);
    let jitter = t.asteroid_aim_jitter;
    let center = t.center();

    let rng = &mut arena.rng;
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let along = rng.random_range(0.0..=edge.span(width, height));
    let size = rng.random_range(size_min..=size_max);
    let radius = size as f32 / 2.0;
    let pos = edge.spawn_point(along, radius, width, height);

    let offset = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    let angle = heading(pos, center) + offset;
    let speed = rng.random_range(speed_min..speed_max);

    arena.insert_asteroid(pos, direction(angle) * speed, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_asteroid_outside_and_inbound() {
        let mut arena = Arena::new(2024);
        for _ in 0..200 {
            spawn_asteroid(&mut arena);
        }
        let (w, h) = (arena.tuning.arena_width, arena.tuning.arena_height);
        for a in &arena.asteroids {
            let outside = a.pos.x < 0.0 || a.pos.x > w || a.pos.y < 0.0 || a.pos.y > h;
            assert!(outside, "asteroid {} spawned inside at {:?}", a.id, a.pos);
            assert!(!a.is_lost(w, h));
            assert!((12.5..=25.0).contains(&a.radius));

            let speed = a.vel.length();
            assert!((2.0 - 1e-4..4.0 + 1e-4).contains(&speed), "speed {speed}");

            // Heading has a positive component toward the center
            let to_center = arena.tuning.center() - a.pos;
            assert!(a.vel.dot(to_center) > 0.0);

            // One step in must not cull it
            let mut moved = a.clone();
            moved.advance();
            assert!(!moved.is_lost(w, h));
        }
    }

    #[test]
    fn test_spawn_is_seed_deterministic() {
        let mut a = Arena::new(77);
        let mut b = Arena::new(77);
        for _ in 0..10 {
            spawn_asteroid(&mut a);
            spawn_asteroid(&mut b);
        }
        assert_eq!(a.asteroids, b.asteroids);
    }

    #[test]
    fn test_edge_spawn_points() {
        assert_eq!(
            Edge::Top.spawn_point(100.0, 10.0, 800.0, 600.0),
            Vec2::new(100.0, -10.0)
        );
        assert_eq!(
            Edge::Right.spawn_point(50.0, 20.0, 800.0, 600.0),
            Vec2::new(820.0, 50.0)
        );
        assert_eq!(Edge::Left.span(800.0, 600.0), 600.0);
    }
}
