//! Axis-aligned bounding-box collision
//!
//! Every entity collides as a square around its center: the ship by its
//! size, bullets and asteroids by their diameter.

use glam::Vec2;

use super::state::{Asteroid, Bullet};

/// Axis-aligned box given by its min/max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square of side `side` centered on `center`
    pub fn square(center: Vec2, side: f32) -> Self {
        let half = Vec2::splat(side / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Pick the asteroid a bullet destroys this tick
///
/// Among live (not yet claimed) asteroids whose box overlaps the bullet's,
/// the one with the nearest center wins; equal distances fall back to the
/// lowest id. Returns an index into `asteroids`.
pub fn bullet_target(bullet: &Bullet, asteroids: &[Asteroid], claimed: &[bool]) -> Option<usize> {
    let bullet_box = bullet.bounds();
    asteroids
        .iter()
        .enumerate()
        .filter(|(i, a)| !claimed[*i] && bullet_box.overlaps(&a.bounds()))
        .min_by(|(_, a), (_, b)| {
            let da = a.pos.distance_squared(bullet.pos);
            let db = b.pos.distance_squared(bullet.pos);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
        .map(|(i, _)| i)
}
