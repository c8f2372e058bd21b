//! Balloon pop flare effects and screen shake
//!
//! A flare is five independent layers, each drawing from its own pool:
//! a two-stage flash, an explosion ring, a spark burst, rising smoke and a
//! wide glow. Every particle carries its own animation and goes back to its
//! pool when that finishes, so nothing here tracks flares in flight.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{Animation, Motion, ParticlePool, PoolConfig};
use super::tween::{Easing, Tween};
use crate::consts::*;
use crate::settings::Settings;

const EXPLOSION_COUNT: usize = 12;
const SPARK_COUNT: usize = 8;
const SMOKE_COUNT: usize = 6;

/// Particles spawned per layer by one flare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlareReport {
    pub flash: u32,
    pub explosion: u32,
    pub spark: u32,
    pub smoke: u32,
    pub glow: u32,
}

impl FlareReport {
    pub fn total(&self) -> u32 {
        self.flash + self.explosion + self.spark + self.smoke + self.glow
    }
}

/// Active particle counts per pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub flash_active: usize,
    pub explosion_active: usize,
    pub spark_active: usize,
    pub smoke_active: usize,
    pub glow_active: usize,
}

/// Fire-and-forget camera perturbation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    /// Fraction of the playfield size the camera may jump
    pub intensity: f32,
    /// Seconds left
    pub remaining: f32,
}

impl ScreenShake {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Start a shake; a stronger running shake is kept but re-armed
    pub fn start(&mut self, intensity: f32, duration: f32) {
        self.intensity = if self.is_active() {
            self.intensity.max(intensity)
        } else {
            intensity
        };
        self.remaining = duration;
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining == 0.0 {
            self.intensity = 0.0;
        }
    }
}

/// Flare effect coordinator
#[derive(Debug, Clone)]
pub struct FlareSystem {
    flash_pool: ParticlePool,
    explosion_pool: ParticlePool,
    spark_pool: ParticlePool,
    smoke_pool: ParticlePool,
    glow_pool: ParticlePool,
    shake: ScreenShake,
    particles_enabled: bool,
    shake_enabled: bool,
    rng: Pcg32,
    destroyed: bool,
}

impl FlareSystem {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let q = settings.quality;
        let pool = |name, capacity, colors: &[u32], min_size, max_size, lifetime| {
            ParticlePool::new(
                name,
                PoolConfig {
                    capacity: q.scale_capacity(capacity),
                    colors: colors.to_vec(),
                    min_size,
                    max_size,
                    lifetime,
                },
            )
        };

        Self {
            flash_pool: pool("flash", 10, &[0xffffff, 0xffa500], 5.0, 20.0, 0.4),
            explosion_pool: pool(
                "explosion",
                20,
                &[0xff4500, 0xffa500, 0xffff00, 0xff6347],
                2.0,
                6.0,
                1.0,
            ),
            spark_pool: pool("spark", 15, &[0xffff00, 0xffd700], 1.0, 3.0, 0.7),
            smoke_pool: pool("smoke", 12, &[0x888888, 0x666666, 0x444444], 4.0, 10.0, 1.2),
            glow_pool: pool("glow", 5, &[0xffa500, 0xffff00], 10.0, 20.0, 0.6),
            shake: ScreenShake::default(),
            particles_enabled: settings.particles,
            shake_enabled: settings.screen_shake,
            rng: Pcg32::seed_from_u64(seed),
            destroyed: false,
        }
    }

    /// Spawn a full flare at `pos`. Saturated pools just spawn less.
    pub fn create_flare(&mut self, pos: Vec2) -> FlareReport {
        let mut report = FlareReport::default();
        if !self.particles_enabled || self.destroyed {
            return report;
        }

        report.flash = self.create_main_flash(pos);
        report.explosion = self.create_explosion_particles(pos);
        report.spark = self.create_secondary_particles(pos);
        report.smoke = self.create_smoke_effect(pos);
        report.glow = self.create_light_glow(pos);

        log::trace!("flare at ({:.0}, {:.0}): {:?}", pos.x, pos.y, report);
        report
    }

    /// White flash then an orange core, both expanding
    fn create_main_flash(&mut self, pos: Vec2) -> u32 {
        let mut spawned = 0;

        if let Some(flash) = self.flash_pool.acquire(pos, Some(0xffffff), &mut self.rng) {
            if let Some(p) = self.flash_pool.get_mut(flash) {
                p.radius = 5.0;
            }
            let anim = Animation::fade(Tween::new(0.15, Easing::CubicOut)).with_radius(40.0);
            self.flash_pool.animate(flash, anim);
            spawned += 1;
        }

        if let Some(core) = self.flash_pool.acquire(pos, Some(0xffa500), &mut self.rng) {
            if let Some(p) = self.flash_pool.get_mut(core) {
                p.radius = 20.0;
                p.alpha = 0.9;
            }
            let anim = Animation::fade(Tween::new(0.4, Easing::CubicOut))
                .with_radius(60.0)
                .with_scale(1.5);
            self.flash_pool.animate(core, anim);
            spawned += 1;
        }

        spawned
    }

    /// Ring of outward particles with angular jitter; gravity after 100 ms
    fn create_explosion_particles(&mut self, pos: Vec2) -> u32 {
        let mut spawned = 0;
        for i in 0..EXPLOSION_COUNT {
            let Some(particle) = self.explosion_pool.acquire(pos, None, &mut self.rng) else {
                continue;
            };

            let jitter: f32 = self.rng.random_range(-0.3..=0.3);
            let angle = i as f32 * TAU / EXPLOSION_COUNT as f32 + jitter;
            let speed: f32 = self.rng.random_range(400.0..=800.0);
            let duration: f32 = self.rng.random_range(0.6..=1.0);

            let anim = Animation::fade(Tween::new(duration, Easing::CubicOut))
                .with_scale(0.5)
                .with_motion(Motion::Ballistic {
                    velocity: crate::direction(angle) * speed,
                    gravity: 200.0,
                    gravity_delay: 0.1,
                });
            self.explosion_pool.animate(particle, anim);
            spawned += 1;
        }
        spawned
    }

    /// Smaller sparks in random directions
    fn create_secondary_particles(&mut self, pos: Vec2) -> u32 {
        let mut spawned = 0;
        for _ in 0..SPARK_COUNT {
            let Some(particle) = self.spark_pool.acquire(pos, None, &mut self.rng) else {
                continue;
            };

            let angle: f32 = self.rng.random_range(0.0..TAU);
            let speed: f32 = self.rng.random_range(200.0..=500.0);
            let duration: f32 = self.rng.random_range(0.4..=0.7);

            let anim = Animation::fade(Tween::new(duration, Easing::CubicOut))
                .with_scale(0.3)
                .with_motion(Motion::Ballistic {
                    velocity: crate::direction(angle) * speed,
                    gravity: 0.0,
                    gravity_delay: 0.0,
                });
            self.spark_pool.animate(particle, anim);
            spawned += 1;
        }
        spawned
    }

    /// Smoke puffs rising with some sideways drift
    fn create_smoke_effect(&mut self, pos: Vec2) -> u32 {
        let mut spawned = 0;
        for _ in 0..SMOKE_COUNT {
            let Some(smoke) = self.smoke_pool.acquire(pos, None, &mut self.rng) else {
                continue;
            };

            let delay: f32 = self.rng.random_range(0.05..=0.2);
            let duration: f32 = self.rng.random_range(0.8..=1.2);
            let to = pos
                + Vec2::new(
                    self.rng.random_range(-40.0..=40.0),
                    -self.rng.random_range(30.0..=80.0),
                );

            let anim = Animation::fade(Tween::new(duration, Easing::SineOut).with_delay(delay))
                .with_scale(2.0)
                .with_motion(Motion::Glide { to });
            self.smoke_pool.animate(smoke, anim);
            spawned += 1;
        }
        spawned
    }

    /// Wide, faint glow
    fn create_light_glow(&mut self, pos: Vec2) -> u32 {
        let Some(glow) = self.glow_pool.acquire(pos, None, &mut self.rng) else {
            return 0;
        };
        if let Some(p) = self.glow_pool.get_mut(glow) {
            p.radius = 10.0;
            p.alpha = 0.3;
        }
        let anim = Animation::fade(Tween::new(0.6, Easing::CubicOut)).with_radius(80.0);
        self.glow_pool.animate(glow, anim);
        1
    }

    /// Shake the camera for a short moment
    pub fn add_screen_shake(&mut self, intensity: f32) {
        if self.shake_enabled && !self.destroyed {
            self.shake.start(intensity, SCREEN_SHAKE_DURATION);
        }
    }

    pub fn screen_shake(&self) -> &ScreenShake {
        &self.shake
    }

    /// Random camera offset for this frame, scaled to the viewport
    pub fn shake_offset(&mut self, viewport: Vec2) -> Vec2 {
        if !self.shake.is_active() {
            return Vec2::ZERO;
        }
        let jitter = Vec2::new(
            self.rng.random_range(-1.0f32..=1.0),
            self.rng.random_range(-1.0f32..=1.0),
        );
        jitter * viewport * self.shake.intensity
    }

    /// Advance every layer and the shake
    pub fn update(&mut self, dt: f32) {
        for pool in self.pools_mut() {
            pool.update(dt);
        }
        self.shake.update(dt);
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            flash_active: self.flash_pool.active_count(),
            explosion_active: self.explosion_pool.active_count(),
            spark_active: self.spark_pool.active_count(),
            smoke_active: self.smoke_pool.active_count(),
            glow_active: self.glow_pool.active_count(),
        }
    }

    /// All layers, back to front
    pub fn pools(&self) -> [&ParticlePool; 5] {
        [
            &self.glow_pool,
            &self.smoke_pool,
            &self.explosion_pool,
            &self.spark_pool,
            &self.flash_pool,
        ]
    }

    fn pools_mut(&mut self) -> [&mut ParticlePool; 5] {
        [
            &mut self.glow_pool,
            &mut self.smoke_pool,
            &mut self.explosion_pool,
            &mut self.spark_pool,
            &mut self.flash_pool,
        ]
    }

    /// Release every pool's resources (scene teardown)
    pub fn destroy(&mut self) {
        for pool in self.pools_mut() {
            pool.cleanup();
        }
        self.shake = ScreenShake::default();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
