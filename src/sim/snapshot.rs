//! Read-only view of the arena for renderers and HUDs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Arena, ArenaPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Bullet,
    Asteroid,
}

/// One live entity as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Facing (ship), travel direction (bullet) or heading (asteroid), radians
    pub angle: f32,
    /// Half the side of the collision box
    pub radius: f32,
    /// False while the ship is in the hidden half of its blink
    pub visible: bool,
}

/// Everything a frame needs, detached from the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: ArenaPhase,
    pub score: u64,
    pub lives: u32,
    pub arena_size: Vec2,
    /// Ship first, then bullets, then asteroids
    pub entities: Vec<EntityView>,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.phase == ArenaPhase::Terminal
    }

    pub fn ship(&self) -> Option<&EntityView> {
        self.of_kind(EntityKind::Ship).next()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }
}

impl Arena {
    /// Capture the current state; pure, so repeated calls agree
    pub fn snapshot(&self) -> Snapshot {
        let mut entities = Vec::with_capacity(1 + self.bullets.len() + self.asteroids.len());

        entities.push(EntityView {
            id: 0,
            kind: EntityKind::Ship,
            pos: self.ship.pos,
            angle: self.ship.facing_angle,
            radius: self.ship.size / 2.0,
            visible: self.ship.is_visible(self.tuning.blink_period_ticks),
        });
        entities.extend(self.bullets.iter().map(|b| EntityView {
            id: b.id,
            kind: EntityKind::Bullet,
            pos: b.pos,
            angle: b.direction_angle,
            radius: b.radius,
            visible: true,
        }));
        entities.extend(self.asteroids.iter().map(|a| EntityView {
            id: a.id,
            kind: EntityKind::Asteroid,
            pos: a.pos,
            angle: a.vel.y.atan2(a.vel.x),
            radius: a.radius,
            visible: true,
        }));

        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            arena_size: Vec2::new(self.tuning.arena_width, self.tuning.arena_height),
            entities,
        }
    }
}
