//! Data-driven game balance
//!
//! Level progression rules and arrow physics. Loaded from JSON so levels
//! can be rebalanced without touching the simulation.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-level resource formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    /// Balloons on level 1
    pub base_balloons: u32,
    /// Extra balloons per level after the first
    pub balloons_per_level: u32,
    /// Arrows on level 1
    pub base_arrows: u32,
    /// Extra arrows per level after the first
    pub arrows_per_level: u32,
    /// Sonar radius on level 1
    pub base_sonar_radius: f32,
    /// Sonar radius lost per level
    pub sonar_shrink_per_level: f32,
    /// Sonar radius never drops below this
    pub min_sonar_radius: f32,
    /// Super sonar radius relative to the regular one
    pub super_sonar_multiplier: f32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            base_balloons: 3,
            balloons_per_level: 1,
            base_arrows: 50,
            arrows_per_level: 2,
            base_sonar_radius: 200.0,
            sonar_shrink_per_level: 10.0,
            min_sonar_radius: 50.0,
            super_sonar_multiplier: 2.0,
        }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub levels: LevelRules,
    /// Arrow speed (pixels/s)
    pub arrow_speed: f32,
    /// Arrow-to-balloon distance that counts as a hit
    pub hit_distance: f32,
    /// Balloon drift speed (pixels/s, 0 = stationary)
    pub balloon_drift_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            levels: LevelRules::default(),
            arrow_speed: ARROW_SPEED,
            hit_distance: HIT_DISTANCE,
            balloon_drift_speed: BALLOON_DRIFT_SPEED,
        }
    }
}

impl Tuning {
    /// Stationary balloons, handy for scripted scenarios
    pub fn stationary() -> Self {
        Self {
            balloon_drift_speed: 0.0,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid tuning JSON")
    }

    /// Load tuning from a JSON file
    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}
