//! Passive entities: balloons, platforms and the player
//!
//! None of these carry behavior beyond visibility, destruction and simple
//! positioning. The systems in this module's siblings drive them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::*;

/// A balloon target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub pos: Vec2,
    /// Drift velocity (pixels/s)
    pub vel: Vec2,
    destroyed: bool,
    hidden: bool,
}

impl Balloon {
    /// New balloons start hidden; only sonar reveals them
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            destroyed: false,
            hidden: true,
        }
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Destroyed balloons are never shown again
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.hidden = true;
        self.vel = Vec2::ZERO;
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Move along the drift velocity, bouncing off `area`
    pub fn drift(&mut self, dt: f32, area: &Bounds) {
        if self.destroyed || self.vel == Vec2::ZERO {
            return;
        }
        self.pos += self.vel * dt;

        if self.pos.x < area.min.x || self.pos.x > area.max.x {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(area.min.x, area.max.x);
        }
        if self.pos.y < area.min.y || self.pos.y > area.max.y {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(area.min.y, area.max.y);
        }
    }
}

/// A fixed teleport platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub index: usize,
    pub pos: Vec2,
    pub size: Vec2,
    hidden: bool,
}

impl Platform {
    pub fn new(index: usize, pos: Vec2) -> Self {
        Self {
            index,
            pos,
            size: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
            hidden: true,
        }
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Where the player stands on this platform
    pub fn standing_point(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, PLAYER_PLATFORM_OFFSET)
    }
}

/// Discrete facing direction of the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Sprite variant for one facing direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacingSprite {
    pub texture: &'static str,
    pub scale: f32,
    /// Offset from the player position to the sprite anchor
    pub offset: Vec2,
}

/// Indexed by `Facing as usize`
const FACING_SPRITES: [FacingSprite; 4] = [
    FacingSprite {
        texture: "player_up",
        scale: 0.12,
        offset: Vec2::new(0.0, -4.0),
    },
    FacingSprite {
        texture: "player_down",
        scale: 0.12,
        offset: Vec2::new(0.0, 4.0),
    },
    FacingSprite {
        texture: "player_left",
        scale: 0.11,
        offset: Vec2::new(-3.0, 0.0),
    },
    FacingSprite {
        texture: "player_right",
        scale: 0.11,
        offset: Vec2::new(3.0, 0.0),
    },
];

impl Facing {
    /// Quadrant of a screen-space aim angle (y grows downward)
    pub fn from_angle(angle: f32) -> Self {
        use std::f32::consts::FRAC_PI_4;
        let angle = crate::normalize_angle(angle);
        if (-FRAC_PI_4..=FRAC_PI_4).contains(&angle) {
            Facing::Right
        } else if angle > FRAC_PI_4 && angle < 3.0 * FRAC_PI_4 {
            Facing::Down
        } else if angle < -FRAC_PI_4 && angle > -3.0 * FRAC_PI_4 {
            Facing::Up
        } else {
            Facing::Left
        }
    }

    pub fn sprite(self) -> &'static FacingSprite {
        &FACING_SPRITES[self as usize]
    }
}

/// The archer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub platform_index: usize,
    pub pos: Vec2,
    pub facing: Facing,
}

impl Player {
    /// Spawn standing on `platforms[0]`
    pub fn new(platforms: &[Platform]) -> Self {
        assert!(!platforms.is_empty(), "player needs at least one platform");
        Self {
            platform_index: 0,
            pos: platforms[0].standing_point(),
            facing: Facing::default(),
        }
    }

    /// Teleport onto a platform; out-of-range indices are ignored
    pub fn teleport_to(&mut self, index: usize, platforms: &[Platform]) -> bool {
        let Some(platform) = platforms.get(index) else {
            return false;
        };
        self.platform_index = index;
        self.pos = platform.standing_point();
        true
    }

    /// Step to the previous (-1) or next (+1) platform slot
    pub fn move_relative(&mut self, delta: i32, platforms: &[Platform]) -> bool {
        let target = self.platform_index as i64 + delta as i64;
        if delta == 0 || target < 0 || target >= platforms.len() as i64 {
            return false;
        }
        self.teleport_to(target as usize, platforms)
    }

    /// Turn toward an aim point
    pub fn aim_at(&mut self, target: Vec2) {
        if target != self.pos {
            self.facing = Facing::from_angle(crate::aim_angle(self.pos, target));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platforms() -> Vec<Platform> {
        PLATFORM_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Platform::new(i, Vec2::new(x, y)))
            .collect()
    }

    #[test]
    fn test_balloon_visibility_independent_of_destruction() {
        let mut b = Balloon::new(1, Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert!(b.is_hidden());
        b.show();
        assert!(!b.is_hidden());
        assert!(!b.is_destroyed());
        b.destroy();
        assert!(b.is_destroyed());
    }

    #[test]
    fn test_balloon_drift_bounces() {
        let area = Bounds::from_size(100.0, 100.0);
        let mut b = Balloon::new(1, Vec2::new(95.0, 50.0), Vec2::new(20.0, 0.0));
        b.drift(0.5, &area);
        assert_eq!(b.pos.x, 100.0);
        assert!(b.vel.x < 0.0);
        b.drift(0.5, &area);
        assert!(b.pos.x < 100.0);
    }

    #[test]
    fn test_teleport_and_relative_moves() {
        let platforms = platforms();
        let mut player = Player::new(&platforms);
        assert_eq!(player.pos, Vec2::new(150.0, 130.0));

        assert!(!player.move_relative(-1, &platforms));
        assert!(player.move_relative(1, &platforms));
        assert_eq!(player.platform_index, 1);
        assert_eq!(player.pos, Vec2::new(650.0, 130.0));

        assert!(player.teleport_to(5, &platforms));
        assert!(!player.move_relative(1, &platforms));
        assert!(!player.teleport_to(6, &platforms));
        assert_eq!(player.platform_index, 5);
    }

    #[test]
    fn test_facing_quadrants() {
        use std::f32::consts::PI;
        assert_eq!(Facing::from_angle(0.0), Facing::Right);
        assert_eq!(Facing::from_angle(PI / 2.0), Facing::Down);
        assert_eq!(Facing::from_angle(-PI / 2.0), Facing::Up);
        assert_eq!(Facing::from_angle(PI), Facing::Left);
        assert_eq!(Facing::from_angle(-PI + 0.1), Facing::Left);
    }

    #[test]
    fn test_facing_sprite_table() {
        assert_eq!(Facing::Left.sprite().texture, "player_left");
        assert_eq!(Facing::Up.sprite().offset, Vec2::new(0.0, -4.0));

        let platforms = platforms();
        let mut player = Player::new(&platforms);
        player.aim_at(player.pos + Vec2::new(0.0, -50.0));
        assert_eq!(player.facing, Facing::Up);
    }
}
