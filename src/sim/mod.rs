//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Mark-then-compact removal, never mutation while iterating
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Aabb, bullet_target};
pub use snapshot::{EntityKind, EntityView, Snapshot};
pub use spawn::{Edge, spawn_asteroid};
pub use state::{Arena, ArenaPhase, Asteroid, Bullet, Ship};
pub use tick::{MoveIntent, TickInput, TickReport, step};
