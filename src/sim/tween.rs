//! Timed interpolation for effects
//!
//! A [`Tween`] only tracks time and easing; whoever owns it decides which
//! values to interpolate with [`Tween::lerp`].

use serde::{Deserialize, Serialize};

/// Easing functions for smooth interpolation.
///
/// These map a linear `t` in [0, 1] onto a different acceleration curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Gentle deceleration following a quarter sine.
    SineOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

/// A one-shot timed progression with an optional start delay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Seconds the interpolation runs once started
    pub duration: f32,
    /// Seconds before the interpolation starts
    pub delay: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl Tween {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: duration.max(0.0),
            delay: 0.0,
            easing,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Seconds since the delay ran out
    pub fn active_time(&self) -> f32 {
        (self.elapsed - self.delay).max(0.0)
    }

    pub fn is_started(&self) -> bool {
        self.elapsed >= self.delay
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Linear progress in [0, 1]
    pub fn raw_progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.is_started() { 1.0 } else { 0.0 };
        }
        (self.active_time() / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.easing.apply(self.raw_progress())
    }

    /// Interpolate between two values at the current eased progress
    pub fn lerp(&self, from: f32, to: f32) -> f32 {
        from + (to - from) * self.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicOut, Easing::SineOut] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        // Out-curves run ahead of linear
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_delay_holds_start_value() {
        let mut t = Tween::new(1.0, Easing::Linear).with_delay(0.5);
        t.advance(0.4);
        assert!(!t.is_started());
        assert_eq!(t.lerp(10.0, 20.0), 10.0);
        t.advance(0.6);
        assert!((t.lerp(10.0, 20.0) - 15.0).abs() < 1e-4);
        t.advance(0.6);
        assert!(t.is_finished());
        assert_eq!(t.lerp(10.0, 20.0), 20.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let t = Tween::new(0.0, Easing::CubicOut);
        assert!(t.is_finished());
        assert_eq!(t.progress(), 1.0);
    }
}
