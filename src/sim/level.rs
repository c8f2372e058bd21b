//! Level progression and resource counters
//!
//! The counters here are the single source of truth for winning or losing a
//! level. Everything else asks this module instead of inferring it.

use serde::{Deserialize, Serialize};

use crate::tuning::LevelRules;

/// Resources and sonar reach for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level number
    pub level: u32,
    pub balloon_count: u32,
    pub arrow_count: u32,
    pub sonar_radius: f32,
    pub super_sonar_radius: f32,
}

/// Derive the config for a 1-based level number
pub fn level_config(level: u32, rules: &LevelRules) -> LevelConfig {
    let steps = level.saturating_sub(1);
    let sonar_radius = (rules.base_sonar_radius - steps as f32 * rules.sonar_shrink_per_level)
        .max(rules.min_sonar_radius);

    LevelConfig {
        level,
        balloon_count: rules.base_balloons + steps * rules.balloons_per_level,
        arrow_count: rules.base_arrows + steps * rules.arrows_per_level,
        sonar_radius,
        super_sonar_radius: sonar_radius * rules.super_sonar_multiplier,
    }
}

/// Lifecycle of the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPhase {
    /// No level started yet
    #[default]
    Idle,
    /// Balloons and arrows in play
    Active,
    /// Every balloon popped
    Complete,
    /// Out of arrows, or the player got caught
    Failed,
}

/// Per-level state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelManager {
    rules: LevelRules,
    /// 0-based level index
    current_level: u32,
    balloons_remaining: u32,
    arrows_left: u32,
    phase: LevelPhase,
    super_sonar_used: bool,
}

impl LevelManager {
    pub fn new(rules: LevelRules) -> Self {
        Self {
            rules,
            current_level: 0,
            balloons_remaining: 0,
            arrows_left: 0,
            phase: LevelPhase::Idle,
            super_sonar_used: false,
        }
    }

    /// 0-based level index
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// 1-based level number, as shown to the player
    pub fn level_number(&self) -> u32 {
        self.current_level + 1
    }

    pub fn config(&self) -> LevelConfig {
        level_config(self.level_number(), &self.rules)
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == LevelPhase::Active
    }

    pub fn balloons_remaining(&self) -> u32 {
        self.balloons_remaining
    }

    pub fn arrows_left(&self) -> u32 {
        self.arrows_left
    }

    /// Reset counters for the current level and start playing it
    pub fn start_level(&mut self) {
        let config = self.config();
        self.balloons_remaining = config.balloon_count;
        self.arrows_left = config.arrow_count;
        self.super_sonar_used = false;
        self.phase = LevelPhase::Active;
        log::info!(
            "Level {} start: {} balloons, {} arrows, sonar r={:.0}",
            config.level,
            config.balloon_count,
            config.arrow_count,
            config.sonar_radius
        );
    }

    pub fn balloon_popped(&mut self) {
        debug_assert!(self.phase != LevelPhase::Idle, "balloon popped before level start");
        self.balloons_remaining = self.balloons_remaining.saturating_sub(1);
    }

    pub fn arrow_shot(&mut self) {
        debug_assert!(self.phase != LevelPhase::Idle, "arrow shot before level start");
        self.arrows_left = self.arrows_left.saturating_sub(1);
    }

    pub fn is_level_complete(&self) -> bool {
        self.balloons_remaining == 0
    }

    pub fn is_level_failed(&self) -> bool {
        self.arrows_left == 0 && self.balloons_remaining > 0
    }

    pub fn mark_complete(&mut self) {
        debug_assert!(self.phase != LevelPhase::Idle, "level completed before start");
        self.phase = LevelPhase::Complete;
    }

    pub fn mark_failed(&mut self) {
        debug_assert!(self.phase != LevelPhase::Idle, "level failed before start");
        self.phase = LevelPhase::Failed;
    }

    /// Whether the super sonar is still unused this level
    pub fn super_sonar_available(&self) -> bool {
        self.is_active() && !self.super_sonar_used
    }

    /// Claim the once-per-level super sonar; false if already used
    pub fn try_use_super_sonar(&mut self) -> bool {
        debug_assert!(self.phase != LevelPhase::Idle, "super sonar before level start");
        if !self.super_sonar_available() {
            return false;
        }
        self.super_sonar_used = true;
        true
    }

    pub fn next_level(&mut self) {
        self.current_level += 1;
        self.start_level();
    }

    pub fn reset_level(&mut self) {
        self.start_level();
    }

    pub fn reset_game(&mut self) {
        self.current_level = 0;
        self.start_level();
    }
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new(LevelRules::default())
    }
}
