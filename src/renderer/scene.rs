//! Snapshot → triangle list
//!
//! Draw order: asteroids, bullets, ship, border.

use glam::Vec2;

use super::shapes::{circle, circle_segments, rect_outline, ship_triangle};
use super::vertex::Vertex;
use crate::settings::Settings;
use crate::sim::{EntityKind, Snapshot};

/// Arena outline thickness in arena units
pub const BORDER_THICKNESS: f32 = 2.0;

/// Build every vertex for one frame
pub fn scene_vertices(snapshot: &Snapshot, settings: &Settings) -> Vec<Vertex> {
    let palette = settings.palette();
    let mut vertices = Vec::new();

    for rock in snapshot.of_kind(EntityKind::Asteroid) {
        vertices.extend(circle(
            rock.pos,
            rock.radius,
            palette.asteroid,
            circle_segments(rock.radius),
        ));
    }

    for bullet in snapshot.of_kind(EntityKind::Bullet) {
        vertices.extend(circle(bullet.pos, bullet.radius, palette.bullet, 8));
    }

    if let Some(ship) = snapshot.ship() {
        let hidden = settings.effective_blink() && !ship.visible;
        if !hidden {
            vertices.extend(ship_triangle(
                ship.pos,
                ship.radius * 2.0,
                ship.angle,
                palette.ship,
            ));
        }
    }

    if settings.show_border {
        vertices.extend(rect_outline(
            Vec2::ZERO,
            snapshot.arena_size,
            BORDER_THICKNESS,
            palette.border,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Arena;

    #[test]
    fn test_empty_arena_draws_ship_and_border() {
        let arena = Arena::new(1);
        let verts = scene_vertices(&arena.snapshot(), &Settings::default());
        assert_eq!(verts.len(), 3 + 24);
    }

    #[test]
    fn test_blinking_ship_hidden_unless_reduced_motion() {
        let mut arena = Arena::new(1);
        arena.ship.invulnerability_timer = 60;
        let snap = arena.snapshot();

        let settings = Settings {
            show_border: false,
            ..Default::default()
        };
        assert!(scene_vertices(&snap, &settings).is_empty());

        let settings = Settings {
            show_border: false,
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(scene_vertices(&snap, &settings).len(), 3);
    }

    #[test]
    fn test_entities_use_palette_colors() {
        let mut arena = Arena::new(1);
        arena.spawn_bullet(Vec2::new(50.0, 50.0), 0.0);
        arena.insert_asteroid(Vec2::new(200.0, 200.0), Vec2::ZERO, 20.0);
        let settings = Settings {
            show_border: false,
            ..Default::default()
        };
        let palette = settings.palette();
        let verts = scene_vertices(&arena.snapshot(), &settings);

        let rock = circle_segments(20.0) as usize * 3;
        assert_eq!(verts.len(), rock + 8 * 3 + 3);
        assert_eq!(verts[0].color, palette.asteroid);
        assert_eq!(verts[rock].color, palette.bullet);
        assert_eq!(verts.last().map(|v| v.color), Some(palette.ship));
    }
}
