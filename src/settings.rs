//! Display settings and preferences
//!
//! Held in memory for the lifetime of the driver. The browser driver reads
//! an optional JSON blob from the canvas `data-settings` attribute.

use serde::{Deserialize, Serialize};

/// RGBA colors the renderer paints with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: [f32; 4],
    pub border: [f32; 4],
    pub ship: [f32; 4],
    pub bullet: [f32; 4],
    pub asteroid: [f32; 4],
}

impl Palette {
    /// Classic look
    pub const CLASSIC: Palette = Palette {
        background: [0.0, 0.0, 0.0, 1.0],
        border: [1.0, 1.0, 1.0, 1.0],
        ship: [0.0, 1.0, 0.784, 1.0],
        bullet: [1.0, 0.902, 0.0, 1.0],
        asteroid: [0.784, 0.784, 0.784, 1.0],
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        background: [0.0, 0.0, 0.0, 1.0],
        border: [1.0, 1.0, 1.0, 1.0],
        ship: [0.0, 1.0, 0.0, 1.0],
        bullet: [1.0, 1.0, 0.0, 1.0],
        asteroid: [1.0, 1.0, 1.0, 1.0],
    };
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flash the ship while it is invulnerable
    pub blink_invulnerable: bool,
    /// Draw the arena outline
    pub show_border: bool,
    /// Optional background image; a flat fill is used when absent or broken
    pub background_url: Option<String>,

    // === Accessibility ===
    /// Reduced motion (no blinking)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blink_invulnerable: true,
            show_border: true,
            background_url: None,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Parse settings, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring bad settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Effective blinking (respects reduced_motion)
    pub fn effective_blink(&self) -> bool {
        self.blink_invulnerable && !self.reduced_motion
    }

    pub fn palette(&self) -> Palette {
        if self.high_contrast {
            Palette::HIGH_CONTRAST
        } else {
            Palette::CLASSIC
        }
    }
}
