//! Fixed tick simulation step
//!
//! Advances the arena by exactly one logical tick. Speeds are per tick and
//! timers count ticks, so the result depends only on state and input.

use glam::Vec2;

use super::collision::bullet_target;
use super::spawn::spawn_asteroid;
use super::state::{Arena, ArenaPhase};
use crate::heading;

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Unit-per-axis displacement; opposite keys cancel
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Pointer position in arena coordinates
    pub aim: Vec2,
    /// Fire held (either mouse button)
    pub fire: bool,
}

/// What happened during one tick (for drivers that want to react)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: bool,
    pub spawned: bool,
    pub asteroids_destroyed: u32,
    pub lives_lost: u32,
    /// This tick moved the arena into Terminal
    pub ended: bool,
}

/// Advance the arena by one tick
///
/// A terminal arena is left untouched.
pub fn step(arena: &mut Arena, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();
    if arena.phase == ArenaPhase::Terminal {
        return report;
    }
    arena.time_ticks += 1;

    update_ship(arena, input);
    report.fired = update_weapon(arena, input.fire);
    report.spawned = update_spawner(arena);
    advance_projectiles(arena);
    report.asteroids_destroyed = resolve_bullet_hits(arena);
    report.lives_lost = resolve_ship_hits(arena);
    report.ended = arena.phase == ArenaPhase::Terminal;

    report
}

fn update_ship(arena: &mut Arena, input: &TickInput) {
    let speed = arena.tuning.ship_speed;
    let (width, height) = (arena.tuning.arena_width, arena.tuning.arena_height);
    let ship = &mut arena.ship;

    ship.translate_clamped(input.movement.axis() * speed, width, height);
    ship.facing_angle = heading(ship.pos, input.aim);
    ship.invulnerability_timer = ship.invulnerability_timer.saturating_sub(1);
}

/// Fire if allowed, then run the cooldown down
fn update_weapon(arena: &mut Arena, fire: bool) -> bool {
    let mut fired = false;
    if fire && arena.fire_cooldown == 0 {
        arena.spawn_bullet(arena.ship.pos, arena.ship.facing_angle);
        arena.fire_cooldown = arena.tuning.fire_cooldown_ticks;
        fired = true;
    }
    arena.fire_cooldown = arena.fire_cooldown.saturating_sub(1);
    fired
}

fn update_spawner(arena: &mut Arena) -> bool {
    arena.spawn_accumulator = arena
        .spawn_accumulator
        .saturating_add(arena.tuning.spawn_increment);
    if arena.spawn_accumulator >= arena.tuning.spawn_threshold {
        spawn_asteroid(arena);
        arena.spawn_accumulator = 0;
        return true;
    }
    false
}

fn advance_projectiles(arena: &mut Arena) {
    let (width, height) = (arena.tuning.arena_width, arena.tuning.arena_height);

    for bullet in &mut arena.bullets {
        bullet.advance();
    }
    arena.bullets.retain(|b| !b.is_off_arena(width, height));

    for asteroid in &mut arena.asteroids {
        asteroid.advance();
    }
    arena.asteroids.retain(|a| !a.is_lost(width, height));
}

/// Each bullet takes out at most one asteroid; mark first, compact after
fn resolve_bullet_hits(arena: &mut Arena) -> u32 {
    let mut asteroid_hit = vec![false; arena.asteroids.len()];
    let mut bullet_hit = vec![false; arena.bullets.len()];
    let mut destroyed = 0;

    for (bi, bullet) in arena.bullets.iter().enumerate() {
        if let Some(ai) = bullet_target(bullet, &arena.asteroids, &asteroid_hit) {
            asteroid_hit[ai] = true;
            bullet_hit[bi] = true;
            destroyed += 1;
        }
    }

    if destroyed > 0 {
        retain_unmarked(&mut arena.bullets, &bullet_hit);
        retain_unmarked(&mut arena.asteroids, &asteroid_hit);
        arena.score += u64::from(destroyed);
    }
    destroyed
}

/// Ship against surviving asteroids, in order; stops once the arena ends
fn resolve_ship_hits(arena: &mut Arena) -> u32 {
    let mut asteroid_hit = vec![false; arena.asteroids.len()];
    let mut lives_lost = 0;

    for (ai, asteroid) in arena.asteroids.iter().enumerate() {
        if arena.ship.is_invulnerable() {
            // Covers both an inherited timer and one armed by an earlier hit this tick
            break;
        }
        if !arena.ship.bounds().overlaps(&asteroid.bounds()) {
            continue;
        }

        asteroid_hit[ai] = true;
        arena.lives = arena.lives.saturating_sub(1);
        arena.ship.invulnerability_timer = arena.tuning.invulnerability_ticks;
        lives_lost += 1;

        if arena.lives == 0 {
            arena.phase = ArenaPhase::Terminal;
            break;
        }
    }

    if lives_lost > 0 {
        retain_unmarked(&mut arena.asteroids, &asteroid_hit);
    }
    lives_lost
}

fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !marked[idx];
        idx += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ArenaPhase;

    fn idle() -> TickInput {
        TickInput {
            aim: Vec2::new(800.0, 300.0),
            ..Default::default()
        }
    }

    /// Arena where nothing spawns on its own
    fn quiet_arena() -> Arena {
        let mut arena = Arena::new(12345);
        arena.tuning.spawn_increment = 0;
        arena
    }

    #[test]
    fn test_ship_moves_and_faces_aim() {
        let mut arena = quiet_arena();
        let input = TickInput {
            movement: MoveIntent {
                right: true,
                up: true,
                ..Default::default()
            },
            aim: Vec2::new(405.0, 0.0),
            fire: false,
        };
        step(&mut arena, &input);
        assert_eq!(arena.ship.pos, Vec2::new(405.0, 295.0));
        // Straight up the screen
        assert!((arena.ship.facing_angle + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let intent = MoveIntent {
            up: true,
            down: true,
            left: true,
            right: false,
        };
        assert_eq!(intent.axis(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_fire_cooldown() {
        let mut arena = quiet_arena();
        let input = TickInput {
            fire: true,
            ..idle()
        };

        let mut fire_ticks = Vec::new();
        for t in 0..25 {
            if step(&mut arena, &input).fired {
                fire_ticks.push(t);
            }
        }
        assert_eq!(fire_ticks, vec![0, 10, 20]);
    }

    #[test]
    fn test_bullet_travels_along_facing() {
        let mut arena = quiet_arena();
        let input = TickInput {
            fire: true,
            ..idle()
        };
        step(&mut arena, &input);
        assert_eq!(arena.bullets.len(), 1);
        // Spawned at the ship then advanced once this tick
        let b = &arena.bullets[0];
        assert!((b.pos - Vec2::new(405.0, 300.0)).length() < 1e-4);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut arena = Arena::new(1);
        let mut spawned_at = Vec::new();
        for t in 1..=15 {
            if step(&mut arena, &idle()).spawned {
                spawned_at.push(t);
            }
        }
        // 10 per tick against a threshold of 45
        assert_eq!(spawned_at, vec![5, 10, 15]);
    }

    #[test]
    fn test_spawn_accumulator_saturates() {
        let mut arena = Arena::new(12345);
        arena.tuning.spawn_increment = 4_000_000_000;
        arena.tuning.spawn_threshold = u32::MAX;

        assert!(!step(&mut arena, &idle()).spawned);
        assert!(step(&mut arena, &idle()).spawned);
        assert_eq!(arena.spawn_accumulator, 0);
        assert_eq!(arena.asteroids.len(), 1);
    }

    #[test]
    fn test_bullet_asteroid_collision_scores() {
        let mut arena = quiet_arena();
        arena.spawn_bullet(Vec2::new(100.0, 100.0), 0.0);
        arena.insert_asteroid(Vec2::new(110.0, 100.0), Vec2::ZERO, 20.0);

        let report = step(&mut arena, &idle());
        assert_eq!(report.asteroids_destroyed, 1);
        assert!(arena.bullets.is_empty());
        assert!(arena.asteroids.is_empty());
        assert_eq!(arena.score, 1);
    }

    #[test]
    fn test_bullet_destroys_only_one_asteroid() {
        let mut arena = quiet_arena();
        arena.spawn_bullet(Vec2::new(100.0, 100.0), 0.0);
        let far = arena.insert_asteroid(Vec2::new(125.0, 100.0), Vec2::ZERO, 20.0);
        arena.insert_asteroid(Vec2::new(106.0, 100.0), Vec2::ZERO, 20.0);

        step(&mut arena, &idle());
        assert_eq!(arena.score, 1);
        assert_eq!(arena.asteroids.len(), 1);
        assert_eq!(arena.asteroids[0].id, far);
    }

    #[test]
    fn test_asteroid_destroyed_once_by_two_bullets() {
        let mut arena = quiet_arena();
        arena.spawn_bullet(Vec2::new(100.0, 100.0), 0.0);
        arena.spawn_bullet(Vec2::new(100.0, 104.0), 0.0);
        arena.insert_asteroid(Vec2::new(110.0, 100.0), Vec2::ZERO, 20.0);

        step(&mut arena, &idle());
        assert_eq!(arena.score, 1);
        assert!(arena.asteroids.is_empty());
        // The second bullet found nothing left to hit
        assert_eq!(arena.bullets.len(), 1);
    }

    #[test]
    fn test_ship_hit_costs_life_and_grants_invulnerability() {
        let mut arena = quiet_arena();
        let ship_pos = arena.ship.pos;
        arena.insert_asteroid(ship_pos, Vec2::ZERO, 20.0);
        arena.insert_asteroid(ship_pos + Vec2::new(5.0, 0.0), Vec2::ZERO, 20.0);

        let report = step(&mut arena, &idle());
        assert_eq!(report.lives_lost, 1);
        assert_eq!(arena.lives, 2);
        assert_eq!(arena.ship.invulnerability_timer, 60);
        // Second overlapping rock survives: the ship was already immune
        assert_eq!(arena.asteroids.len(), 1);

        let report = step(&mut arena, &idle());
        assert_eq!(report.lives_lost, 0);
        assert_eq!(arena.lives, 2);
        assert_eq!(arena.ship.invulnerability_timer, 59);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut arena = quiet_arena();
        arena.lives = 1;
        let ship_pos = arena.ship.pos;
        arena.insert_asteroid(ship_pos, Vec2::ZERO, 20.0);

        let report = step(&mut arena, &idle());
        assert!(report.ended);
        assert_eq!(arena.lives, 0);
        assert_eq!(arena.phase, ArenaPhase::Terminal);
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let mut arena = quiet_arena();
        arena.phase = ArenaPhase::Terminal;
        let before = arena.snapshot();
        let input = TickInput {
            fire: true,
            movement: MoveIntent {
                left: true,
                ..Default::default()
            },
            ..idle()
        };
        let report = step(&mut arena, &input);
        assert_eq!(report, TickReport::default());
        assert_eq!(arena.snapshot(), before);
    }

    #[test]
    fn test_determinism() {
        // Two arenas with same seed should produce identical results
        let mut arena1 = Arena::new(99999);
        let mut arena2 = Arena::new(99999);

        let inputs = [
            TickInput {
                aim: Vec2::new(0.0, 0.0),
                fire: true,
                ..Default::default()
            },
            TickInput {
                movement: MoveIntent {
                    down: true,
                    ..Default::default()
                },
                aim: Vec2::new(600.0, 100.0),
                fire: true,
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                step(&mut arena1, input);
                step(&mut arena2, input);
            }
        }

        assert_eq!(arena1.snapshot(), arena2.snapshot());
    }
}
