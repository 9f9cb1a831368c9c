//! Arena state and core simulation types
//!
//! The arena exclusively owns every live entity. Nothing here talks to a
//! window, clock or input device; see `tick::step` for the transition.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::direction;
use crate::tuning::Tuning;

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaPhase {
    /// Accepting ticks
    Running,
    /// Lives exhausted; absorbing
    Terminal,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    /// Side of the bounding square
    pub size: f32,
    /// Radians, screen space (y down); recomputed from the aim point every tick
    pub facing_angle: f32,
    /// Ticks of immunity left
    pub invulnerability_timer: u32,
}

impl Ship {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            facing_angle: 0.0,
            invulnerability_timer: 0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability_timer > 0
    }

    /// Blink while invulnerable: hidden on even `blink_period` windows
    pub fn is_visible(&self, blink_period: u32) -> bool {
        !self.is_invulnerable() || (self.invulnerability_timer / blink_period.max(1)) % 2 != 0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Move by `delta` and clamp into `[size/2, W-size/2] × [size/2, H-size/2]`
    pub fn translate_clamped(&mut self, delta: Vec2, width: f32, height: f32) {
        let half = self.size / 2.0;
        let next = self.pos + delta;
        self.pos = Vec2::new(
            next.x.clamp(half, width - half),
            next.y.clamp(half, height - half),
        );
    }
}

/// A bullet travelling in a straight line
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Fixed at creation from the ship's facing angle
    pub direction_angle: f32,
    pub speed: f32,
    pub radius: f32,
}

impl Bullet {
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        direction(self.direction_angle) * self.speed
    }

    pub fn advance(&mut self) {
        self.pos += self.velocity();
    }

    /// Center left `[0,W]×[0,H]`
    pub fn is_off_arena(&self, width: f32, height: f32) -> bool {
        !(0.0..=width).contains(&self.pos.x) || !(0.0..=height).contains(&self.pos.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.radius * 2.0)
    }
}

/// An asteroid drifting in from an edge
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Asteroid {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// More than its own radius outside the arena on any side
    pub fn is_lost(&self, width: f32, height: f32) -> bool {
        let r = self.radius;
        self.pos.x < -r || self.pos.x > width + r || self.pos.y < -r || self.pos.y > height + r
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.radius * 2.0)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Arena {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: ArenaPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    pub lives: u32,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub spawn_accumulator: u32,
    pub fire_cooldown: u32,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Arena {
    /// Create a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a session with the given balance; the ship starts centered
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let ship = Ship::new(tuning.center(), tuning.ship_size);
        Self {
            seed,
            phase: ArenaPhase::Running,
            time_ticks: 0,
            score: 0,
            lives: tuning.starting_lives,
            ship,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            spawn_accumulator: 0,
            fire_cooldown: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase == ArenaPhase::Terminal
    }

    /// Place a bullet at `pos` heading along `angle`
    pub fn spawn_bullet(&mut self, pos: Vec2, angle: f32) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos,
            direction_angle: angle,
            speed: self.tuning.bullet_speed,
            radius: self.tuning.bullet_radius,
        });
        id
    }

    /// Insert an asteroid with explicit kinematics (spawning uses `spawn::spawn_asteroid`)
    pub fn insert_asteroid(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.asteroids.push(Asteroid {
            id,
            pos,
            vel,
            radius,
        });
        id
    }
}
