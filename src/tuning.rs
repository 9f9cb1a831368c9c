//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a session can be
//! rebalanced from JSON without touching code. Defaults reproduce the
//! classic feel (800×600, 60 Hz).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters for one arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,

    /// Side of the ship's bounding square
    pub ship_size: f32,
    /// Units per tick per held direction
    pub ship_speed: f32,

    pub bullet_radius: f32,
    pub bullet_speed: f32,

    pub asteroid_size_min: u32,
    pub asteroid_size_max: u32,
    pub asteroid_speed_min: f32,
    pub asteroid_speed_max: f32,
    /// Max deviation from a center-bound heading (radians)
    pub asteroid_aim_jitter: f32,

    pub spawn_increment: u32,
    pub spawn_threshold: u32,

    pub fire_cooldown_ticks: u32,
    pub invulnerability_ticks: u32,
    pub blink_period_ticks: u32,

    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ship_size: SHIP_SIZE,
            ship_speed: SHIP_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            asteroid_size_min: ASTEROID_SIZE_MIN,
            asteroid_size_max: ASTEROID_SIZE_MAX,
            asteroid_speed_min: ASTEROID_SPEED_MIN,
            asteroid_speed_max: ASTEROID_SPEED_MAX,
            asteroid_aim_jitter: ASTEROID_AIM_JITTER,
            spawn_increment: SPAWN_INCREMENT,
            spawn_threshold: SPAWN_THRESHOLD,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
            invulnerability_ticks: INVULNERABILITY_TICKS,
            blink_period_ticks: BLINK_PERIOD_TICKS,
            starting_lives: STARTING_LIVES,
        }
    }
}

/// Why a tuning was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Parse(String),
    ArenaTooSmall { width: f32, height: f32, ship_size: f32 },
    NonPositive { field: &'static str },
    Negative { field: &'static str },
    JitterTooWide { jitter: f32, limit: f32 },
    EmptyRange { field: &'static str },
    NoLives,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::ArenaTooSmall {
                width,
                height,
                ship_size,
            } => write!(
                f,
                "arena {width}x{height} cannot hold a ship of size {ship_size}"
            ),
            Self::NonPositive { field } => write!(f, "{field} must be positive"),
            Self::Negative { field } => write!(f, "{field} must be finite and not negative"),
            Self::JitterTooWide { jitter, limit } => write!(
                f,
                "asteroid_aim_jitter {jitter} can aim spawns outward (limit {limit})"
            ),
            Self::EmptyRange { field } => write!(f, "{field} range is empty (min > max)"),
            Self::NoLives => write!(f, "starting_lives must be at least 1"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ship_size", self.ship_size),
            ("bullet_radius", self.bullet_radius),
            ("bullet_speed", self.bullet_speed),
            ("asteroid_speed_min", self.asteroid_speed_min),
        ];
        for (field, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NonPositive { field });
            }
        }
        let non_negatives = [
            ("ship_speed", self.ship_speed),
            ("asteroid_speed_max", self.asteroid_speed_max),
            ("asteroid_aim_jitter", self.asteroid_aim_jitter),
        ];
        for (field, value) in non_negatives {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Negative { field });
            }
        }
        if self.asteroid_size_min == 0 {
            return Err(TuningError::NonPositive {
                field: "asteroid_size_min",
            });
        }
        if self.spawn_threshold == 0 {
            return Err(TuningError::NonPositive {
                field: "spawn_threshold",
            });
        }
        if self.blink_period_ticks == 0 {
            return Err(TuningError::NonPositive {
                field: "blink_period_ticks",
            });
        }

        if self.ship_size > self.arena_width || self.ship_size > self.arena_height {
            return Err(TuningError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
                ship_size: self.ship_size,
            });
        }
        if self.asteroid_size_min > self.asteroid_size_max {
            return Err(TuningError::EmptyRange {
                field: "asteroid_size",
            });
        }
        // Uniform draws over [min, max) need a non-empty half-open range
        if self.asteroid_speed_min >= self.asteroid_speed_max {
            return Err(TuningError::EmptyRange {
                field: "asteroid_speed",
            });
        }
        let limit = self.max_aim_jitter();
        if self.asteroid_aim_jitter >= limit {
            return Err(TuningError::JitterTooWide {
                jitter: self.asteroid_aim_jitter,
                limit,
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::NoLives);
        }
        Ok(())
    }

    /// Widest jitter that still sends every spawn inward
    ///
    /// A rock entering at a corner of the long edge is already
    /// `atan(long / short)` off that edge's normal, leaving
    /// `atan(short / long)` before its heading turns parallel to the edge.
    pub fn max_aim_jitter(&self) -> f32 {
        let long = self.arena_width.max(self.arena_height);
        let short = self.arena_width.min(self.arena_height);
        (short / long).atan()
    }

    /// Arena center point
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "ship_speed": 7.5, "starting_lives": 5 }"#).unwrap();
        assert_eq!(tuning.ship_speed, 7.5);
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
        assert_eq!(tuning.spawn_threshold, SPAWN_THRESHOLD);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let tuning = Tuning {
            asteroid_size_min: 60,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::EmptyRange {
                field: "asteroid_size"
            })
        );

        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Err(TuningError::NoLives));

        let tuning = Tuning {
            ship_size: 1000.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_speed_and_wide_jitter() {
        let tuning = Tuning {
            ship_speed: -5.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::Negative {
                field: "ship_speed"
            })
        );

        let tuning = Tuning {
            asteroid_aim_jitter: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::Negative {
                field: "asteroid_aim_jitter"
            })
        );

        let err = Tuning::from_json(r#"{ "asteroid_aim_jitter": 1.2 }"#).unwrap_err();
        assert!(matches!(err, TuningError::JitterTooWide { .. }));

        // A standing ship and aimless rocks are still valid
        let tuning = Tuning {
            ship_speed: 0.0,
            asteroid_aim_jitter: 0.0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn test_max_aim_jitter_default_arena() {
        let limit = Tuning::default().max_aim_jitter();
        assert!((limit - 0.75f32.atan()).abs() < 1e-6);
        assert!(ASTEROID_AIM_JITTER < limit);
    }

    #[test]
    fn test_error_display() {
        let err = TuningError::NonPositive { field: "ship_size" };
        assert_eq!(err.to_string(), "ship_size must be positive");
    }
}
