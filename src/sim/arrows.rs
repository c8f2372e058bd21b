//! Arrow flight and hit detection
//!
//! Arrows fly in a straight line at a fixed speed. Each update moves every
//! arrow, then retires it if it left the playfield, or if it reached a live
//! balloon, in that order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Balloon;
use crate::Bounds;

/// A live arrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Flight direction in radians, for sprite rotation
    pub angle: f32,
}

/// What happened to arrows during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrowReport {
    pub out_of_bounds: u32,
    pub hits: u32,
}

/// Owns every arrow in flight
#[derive(Debug, Clone)]
pub struct ArrowSystem {
    arrows: Vec<Arrow>,
    speed: f32,
    hit_distance: f32,
    next_id: u32,
}

impl ArrowSystem {
    pub fn new(speed: f32, hit_distance: f32) -> Self {
        Self {
            arrows: Vec::new(),
            speed,
            hit_distance,
            next_id: 1,
        }
    }

    /// Launch an arrow from `from` toward `to`.
    ///
    /// The arrow budget is the caller's business; this always fires.
    pub fn shoot(&mut self, from: Vec2, to: Vec2) -> u32 {
        let angle = crate::aim_angle(from, to);
        let id = self.next_id;
        self.next_id += 1;

        self.arrows.push(Arrow {
            id,
            pos: from,
            vel: crate::direction(angle) * self.speed,
            angle,
        });
        log::debug!(
            "arrow {} fired from ({:.0}, {:.0}) at {:.1} deg",
            id,
            from.x,
            from.y,
            angle.to_degrees()
        );
        id
    }

    /// Move all arrows by `dt` and resolve them.
    ///
    /// An arrow outside `bounds` is dropped without a hit test. Otherwise the
    /// closest live balloon strictly within the hit distance is handed to
    /// `on_hit` and the arrow is dropped. `on_hit` is expected to destroy the
    /// balloon so later arrows in the same update skip it.
    pub fn update(
        &mut self,
        dt: f32,
        balloons: &mut [Balloon],
        bounds: &Bounds,
        mut on_hit: impl FnMut(&mut Balloon),
    ) -> ArrowReport {
        let mut report = ArrowReport::default();
        let hit_distance = self.hit_distance;

        self.arrows.retain_mut(|arrow| {
            arrow.pos += arrow.vel * dt;

            if !bounds.contains(arrow.pos) {
                report.out_of_bounds += 1;
                return false;
            }

            let struck = balloons
                .iter_mut()
                .filter(|b| !b.is_destroyed())
                .map(|b| (arrow.pos.distance(b.pos), b))
                .filter(|(d, _)| *d < hit_distance)
                .min_by(|a, b| a.0.total_cmp(&b.0));

            match struck {
                Some((_, balloon)) => {
                    log::debug!("arrow {} hit balloon {}", arrow.id, balloon.id);
                    on_hit(balloon);
                    report.hits += 1;
                    false
                }
                None => true,
            }
        });

        report
    }

    /// Drop every arrow without resolving hits
    pub fn clear(&mut self) {
        self.arrows.clear();
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }
}
