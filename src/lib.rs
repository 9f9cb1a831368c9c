//! Asteroid Arena - a rectangular arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic tick simulation (ship, bullets, asteroids, collisions)
//! - `driver`: Fixed-timestep frame driver and restart loop
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Display preferences

pub mod driver;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::FrameDriver;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ship defaults (size is the side of its bounding square)
    pub const SHIP_SIZE: f32 = 40.0;
    pub const SHIP_SPEED: f32 = 5.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 6.0;
    pub const BULLET_SPEED: f32 = 5.0;

    /// Asteroid size range (diameter, integer draw, inclusive)
    pub const ASTEROID_SIZE_MIN: u32 = 25;
    pub const ASTEROID_SIZE_MAX: u32 = 50;
    /// Asteroid speed range (units per tick)
    pub const ASTEROID_SPEED_MIN: f32 = 2.0;
    pub const ASTEROID_SPEED_MAX: f32 = 4.0;
    /// Random deviation from the center-bound heading (radians, ±)
    pub const ASTEROID_AIM_JITTER: f32 = 0.5;

    /// Spawn accumulator gain per tick and the level that triggers a spawn
    pub const SPAWN_INCREMENT: u32 = 10;
    pub const SPAWN_THRESHOLD: u32 = 45;

    /// Ticks between shots
    pub const FIRE_COOLDOWN_TICKS: u32 = 10;
    /// Ticks of immunity after losing a life
    pub const INVULNERABILITY_TICKS: u32 = 60;
    /// Invulnerable ship toggles visibility every this many ticks
    pub const BLINK_PERIOD_TICKS: u32 = 5;

    pub const STARTING_LIVES: u32 = 3;
}

/// Angle (radians) of the vector from `from` to `to`, in screen space (y down)
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle in screen space
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_screen_space() {
        // Straight down the screen is +π/2 with y pointing down
        let a = heading(Vec2::new(100.0, 100.0), Vec2::new(100.0, 200.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_direction_matches_heading() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(40.0, -30.0);
        let dir = direction(heading(from, to));
        let expected = (to - from).normalize();
        assert!((dir - expected).length() < 1e-5);
    }
}
