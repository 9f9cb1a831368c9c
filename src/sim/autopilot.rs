//! Idle/demo mode - the arena plays itself
//!
//! Produces a `TickInput` from the current state only, so a demo run is as
//! deterministic as a recorded one.

use glam::Vec2;

use super::state::Arena;
use super::tick::{MoveIntent, TickInput};

/// Asteroids whose center is closer than this (plus their radius) are threats
const DANGER_RADIUS: f32 = 110.0;
/// How far ahead (ticks) to lead a moving target
const LEAD_TICKS: f32 = 8.0;
/// Dead zone before the ship bothers returning to center
const HOME_SLACK: f32 = 40.0;

/// Choose the input a cautious player would give this tick
pub fn autopilot_input(arena: &Arena) -> TickInput {
    let ship = arena.ship.pos;

    // Nearest asteroid by center distance
    let target = arena.asteroids.iter().min_by(|a, b| {
        a.pos
            .distance_squared(ship)
            .partial_cmp(&b.pos.distance_squared(ship))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let aim = match target {
        // Lead the target slightly
        Some(a) => a.pos + a.vel * LEAD_TICKS,
        None => ship + Vec2::X,
    };

    // Sum of pushes away from close asteroids, weighted by closeness
    let threat = arena
        .asteroids
        .iter()
        .filter_map(|a| {
            let away = ship - a.pos;
            let dist = away.length();
            let reach = DANGER_RADIUS + a.radius;
            (dist < reach).then(|| away.normalize_or_zero() * (reach - dist) / reach)
        })
        .fold(Vec2::ZERO, |acc, push| acc + push);

    let desired = if threat.length_squared() > 1e-6 {
        threat
    } else {
        let home = arena.tuning.center() - ship;
        if home.length() > HOME_SLACK { home } else { Vec2::ZERO }
    };

    TickInput {
        movement: intent_toward(desired),
        aim,
        fire: target.is_some(),
    }
}

/// Quantize a desired direction onto the four movement keys
fn intent_toward(dir: Vec2) -> MoveIntent {
    let dir = dir.normalize_or_zero();
    // ~22.5 degrees either side of an axis still counts for that axis
    const AXIS: f32 = 0.38;
    MoveIntent {
        up: dir.y < -AXIS,
        down: dir.y > AXIS,
        left: dir.x < -AXIS,
        right: dir.x > AXIS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::step;

    #[test]
    fn test_idle_arena_holds_fire() {
        let arena = Arena::new(1);
        let input = autopilot_input(&arena);
        assert!(!input.fire);
        assert_eq!(input.movement, MoveIntent::default());
    }

    #[test]
    fn test_aims_at_nearest_and_fires() {
        let mut arena = Arena::new(1);
        arena.insert_asteroid(Vec2::new(700.0, 300.0), Vec2::ZERO, 20.0);
        arena.insert_asteroid(Vec2::new(400.0, 100.0), Vec2::ZERO, 20.0);
        let input = autopilot_input(&arena);
        assert!(input.fire);
        assert_eq!(input.aim, Vec2::new(400.0, 100.0));
    }

    #[test]
    fn test_flees_close_asteroid() {
        let mut arena = Arena::new(1);
        // Rock just left of the ship
        arena.insert_asteroid(Vec2::new(340.0, 300.0), Vec2::ZERO, 20.0);
        let input = autopilot_input(&arena);
        assert!(input.movement.right);
        assert!(!input.movement.left);
    }

    #[test]
    fn test_demo_run_scores() {
        let mut arena = Arena::new(2026);
        for _ in 0..3000 {
            if arena.is_terminal() {
                break;
            }
            let input = autopilot_input(&arena);
            step(&mut arena, &input);
        }
        assert!(arena.score > 0, "autopilot never hit anything");
    }
}
