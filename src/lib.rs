//! Sonar Archer - A single-screen sonar archery arcade game
//!
//! Core modules:
//! - `sim`: Simulation (levels, arrows, particle effects, sonar reveal)
//! - `settings`: Player preferences (effects quality, screen shake)
//! - `tuning`: Data-driven game balance
//! - `web`: wasm-bindgen facade for a browser presentation layer

pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{QualityPreset, Settings};
pub use tuning::{LevelRules, Tuning};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Fixed platform slots, top-left to bottom-right
    pub const PLATFORM_POSITIONS: [(f32, f32); 6] = [
        (150.0, 150.0),
        (650.0, 150.0),
        (250.0, 300.0),
        (550.0, 300.0),
        (150.0, 450.0),
        (650.0, 450.0),
    ];
    pub const PLATFORM_WIDTH: f32 = 80.0;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    /// Player stands this far above the platform center
    pub const PLAYER_PLATFORM_OFFSET: f32 = 20.0;

    /// Arrow defaults
    pub const ARROW_SPEED: f32 = 500.0;
    pub const HIT_DISTANCE: f32 = 20.0;

    /// Balloons spawn this far inside the playfield edges
    pub const BALLOON_SPAWN_MARGIN: f32 = 50.0;
    pub const BALLOON_DRIFT_SPEED: f32 = 25.0;
    /// Spawn re-rolls before accepting a position near the player
    pub const BALLOON_SPAWN_ATTEMPTS: u32 = 16;
    /// Preferred minimum spawn distance from the player
    pub const BALLOON_SPAWN_CLEARANCE: f32 = 100.0;

    /// Sonar pulse timing (seconds)
    pub const SONAR_PULSE_DURATION: f32 = 1.0;
    pub const SONAR_START_RADIUS: f32 = 1.0;
    pub const SONAR_PULSE_ALPHA: f32 = 0.3;
    pub const BALLOON_REVEAL_WINDOW: f32 = 1.8;
    pub const PLATFORM_REVEAL_WINDOW: f32 = 2.0;

    /// Level flow delays (seconds)
    pub const LEVEL_ADVANCE_DELAY: f32 = 2.0;
    pub const FAILURE_GRACE_DELAY: f32 = 1.0;

    /// A balloon this close to the player ends the run
    pub const PLAYER_COLLISION_DISTANCE: f32 = 30.0;
    pub const COLLISION_FLARE_DELAY: f32 = 0.3;
    pub const COLLISION_GAME_OVER_DELAY: f32 = 1.2;
    pub const COLLISION_SHAKE_INTENSITY: f32 = 0.02;

    /// Camera shake
    pub const SCREEN_SHAKE_DURATION: f32 = 0.3;
    pub const DEFAULT_SHAKE_INTENSITY: f32 = 0.005;
}

/// Axis-aligned rectangle, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from the origin to (width, height)
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Shrink every edge by `margin`
    pub fn inset(&self, margin: f32) -> Self {
        Self::new(self.min + Vec2::splat(margin), self.max - Vec2::splat(margin))
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(consts::PLAYFIELD_WIDTH, consts::PLAYFIELD_HEIGHT)
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle (radians, screen space) of the ray from `from` to `to`
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
