//! Sonar reveal pulses
//!
//! Activating sonar reveals every balloon and platform within the pulse
//! radius for a fixed window, and starts an expanding ring visual. Only one
//! ring animates at a time; a new activation replaces the old ring, while
//! the reveal windows of earlier pulses keep running on their own timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{Balloon, Platform};
use super::schedule::Scheduler;
use super::tween::{Easing, Tween};
use crate::consts::*;

/// Regular pulse or the once-per-level super pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SonarKind {
    Normal,
    Super,
}

/// The expanding ring visual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SonarPulse {
    pub id: u32,
    pub kind: SonarKind,
    pub origin: Vec2,
    /// Radius the ring expands to
    pub max_radius: f32,
    pub radius: f32,
    pub alpha: f32,
    tween: Tween,
}

impl SonarPulse {
    fn new(id: u32, kind: SonarKind, origin: Vec2, max_radius: f32) -> Self {
        Self {
            id,
            kind,
            origin,
            max_radius,
            radius: SONAR_START_RADIUS,
            alpha: SONAR_PULSE_ALPHA,
            tween: Tween::new(SONAR_PULSE_DURATION, Easing::CubicOut),
        }
    }

    /// Advance the ring; true once it has faded out
    fn step(&mut self, dt: f32) -> bool {
        self.tween.advance(dt);
        self.radius = self.tween.lerp(SONAR_START_RADIUS, self.max_radius);
        self.alpha = self.tween.lerp(SONAR_PULSE_ALPHA, 0.0);
        self.tween.is_finished()
    }
}

/// Pending end of a reveal window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealExpiry {
    Balloon(u32),
    Platform(usize),
}

/// Result of one activation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SonarReport {
    pub pulse_id: u32,
    /// Pulse that was still animating and got cut short
    pub replaced: Option<u32>,
    pub revealed_balloons: Vec<u32>,
    pub revealed_platforms: Vec<usize>,
}

/// Sonar pulse and reveal-window bookkeeping
#[derive(Debug, Clone, Default)]
pub struct SonarSystem {
    pulse: Option<SonarPulse>,
    expiries: Scheduler<RevealExpiry>,
    next_pulse_id: u32,
}

impl SonarSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a pulse from `origin`, revealing everything within `radius`
    /// (inclusive).
    pub fn activate(
        &mut self,
        origin: Vec2,
        balloons: &mut [Balloon],
        platforms: &mut [Platform],
        radius: f32,
        kind: SonarKind,
    ) -> SonarReport {
        let replaced = self.pulse.take().map(|p| p.id);
        if let Some(old) = replaced {
            log::debug!("sonar pulse {} replaced before fading out", old);
        }

        self.next_pulse_id += 1;
        let pulse_id = self.next_pulse_id;
        self.pulse = Some(SonarPulse::new(pulse_id, kind, origin, radius));

        let mut report = SonarReport {
            pulse_id,
            replaced,
            ..Default::default()
        };

        for balloon in balloons.iter_mut().filter(|b| !b.is_destroyed()) {
            if origin.distance(balloon.pos) <= radius {
                balloon.show();
                self.expiries
                    .schedule(BALLOON_REVEAL_WINDOW, RevealExpiry::Balloon(balloon.id));
                report.revealed_balloons.push(balloon.id);
            }
        }

        for platform in platforms.iter_mut() {
            if origin.distance(platform.pos) <= radius {
                platform.show();
                self.expiries
                    .schedule(PLATFORM_REVEAL_WINDOW, RevealExpiry::Platform(platform.index));
                report.revealed_platforms.push(platform.index);
            }
        }

        log::debug!(
            "{:?} sonar r={:.0}: {} balloons, {} platforms revealed",
            kind,
            radius,
            report.revealed_balloons.len(),
            report.revealed_platforms.len()
        );
        report
    }

    /// Advance the ring and close reveal windows that ran out
    pub fn update(&mut self, dt: f32, balloons: &mut [Balloon], platforms: &mut [Platform]) {
        let faded = self.pulse.as_mut().is_some_and(|p| p.step(dt));
        if faded {
            self.pulse = None;
        }

        for expiry in self.expiries.advance(dt) {
            match expiry {
                RevealExpiry::Balloon(id) => {
                    // Popped or despawned balloons stay as they are
                    if let Some(b) = balloons.iter_mut().find(|b| b.id == id && !b.is_destroyed()) {
                        b.hide();
                    }
                }
                RevealExpiry::Platform(index) => {
                    if let Some(p) = platforms.get_mut(index) {
                        p.hide();
                    }
                }
            }
        }
    }

    /// Ring currently animating, if any
    pub fn pulse(&self) -> Option<&SonarPulse> {
        self.pulse.as_ref()
    }

    /// Reveal windows still open
    pub fn pending_reveals(&self) -> usize {
        self.expiries.len()
    }

    /// Stop the ring and forget every open reveal window
    pub fn cleanup(&mut self) {
        self.pulse = None;
        self.expiries.clear();
    }
}
