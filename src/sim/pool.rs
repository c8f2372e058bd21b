//! Fixed-capacity particle pools
//!
//! Every particle is allocated up front. The pool keeps an index permutation
//! split into `[active | inactive]` at `active_count`, so acquire takes the
//! first inactive slot and release swaps the slot behind the boundary. Both
//! are O(1) and the slot data never moves, which keeps handles stable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tween::Tween;

/// Pool construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub capacity: usize,
    /// Palette picked from when no color override is given
    pub colors: Vec<u32>,
    pub min_size: f32,
    pub max_size: f32,
    /// Nominal lifetime in seconds (informational, animations set the real one)
    pub lifetime: f32,
}

/// Reference to an acquired particle.
///
/// A handle goes stale once its particle is released, even if the slot is
/// handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    slot: u32,
    generation: u32,
}

/// How an animated particle moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Stays where it was acquired
    Static,
    /// Constant launch velocity, gravity kicks in after `gravity_delay` seconds
    Ballistic {
        velocity: Vec2,
        gravity: f32,
        gravity_delay: f32,
    },
    /// Eases from the acquire position to `to`
    Glide { to: Vec2 },
}

/// Target values a particle animates toward; start values are captured
/// from the particle when the animation is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub tween: Tween,
    pub radius_to: Option<f32>,
    pub alpha_to: f32,
    pub scale_to: f32,
    pub motion: Motion,
}

impl Animation {
    /// Fade to transparent over `tween`, nothing else changes
    pub fn fade(tween: Tween) -> Self {
        Self {
            tween,
            radius_to: None,
            alpha_to: 0.0,
            scale_to: 1.0,
            motion: Motion::Static,
        }
    }

    pub fn with_radius(mut self, to: f32) -> Self {
        self.radius_to = Some(to);
        self
    }

    pub fn with_scale(mut self, to: f32) -> Self {
        self.scale_to = to;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Running {
    anim: Animation,
    pos_from: Vec2,
    radius_from: f32,
    alpha_from: f32,
    scale_from: f32,
}

/// A pooled visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    pub alpha: f32,
    pub scale: f32,
    active: bool,
    generation: u32,
    running: Option<Running>,
}

impl Particle {
    fn inactive() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 1.0,
            color: 0xffffff,
            alpha: 0.0,
            scale: 1.0,
            active: false,
            generation: 0,
            running: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Advance the animation; true once it has finished
    fn step(&mut self, dt: f32) -> bool {
        let Some(run) = self.running.as_mut() else {
            return false;
        };
        run.anim.tween.advance(dt);
        let tween = run.anim.tween;

        match run.anim.motion {
            Motion::Static => {}
            Motion::Ballistic {
                gravity,
                gravity_delay,
                ..
            } => {
                if tween.active_time() >= gravity_delay {
                    self.vel.y += gravity * dt;
                }
                self.pos += self.vel * dt;
            }
            Motion::Glide { to } => {
                self.pos = run.pos_from.lerp(to, tween.progress());
            }
        }

        if let Some(to) = run.anim.radius_to {
            self.radius = tween.lerp(run.radius_from, to);
        }
        self.alpha = tween.lerp(run.alpha_from, run.anim.alpha_to);
        self.scale = tween.lerp(run.scale_from, run.anim.scale_to);

        tween.is_finished()
    }
}

/// Fixed-capacity particle arena
#[derive(Debug, Clone)]
pub struct ParticlePool {
    name: &'static str,
    config: PoolConfig,
    slots: Vec<Particle>,
    /// Slot indices; `order[..active_count]` are the active ones
    order: Vec<u32>,
    /// Inverse of `order`: slot index -> position in `order`
    position: Vec<u32>,
    active_count: usize,
}

impl ParticlePool {
    pub fn new(name: &'static str, config: PoolConfig) -> Self {
        let capacity = config.capacity;
        Self {
            name,
            config,
            slots: (0..capacity).map(|_| Particle::inactive()).collect(),
            order: (0..capacity as u32).collect(),
            position: (0..capacity as u32).collect(),
            active_count: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Slots owned by the pool (0 after cleanup)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Take an inactive particle, configured with a random size and color.
    ///
    /// Returns `None` when every slot is in use; callers drop that part of
    /// the effect.
    pub fn acquire(
        &mut self,
        pos: Vec2,
        color: Option<u32>,
        rng: &mut impl Rng,
    ) -> Option<ParticleHandle> {
        if self.active_count >= self.slots.len() {
            log::trace!("{} pool exhausted ({} active)", self.name, self.active_count);
            return None;
        }

        let slot = self.order[self.active_count];
        self.active_count += 1;

        let radius = if self.config.max_size > self.config.min_size {
            rng.random_range(self.config.min_size..=self.config.max_size)
        } else {
            self.config.min_size
        };
        let color = color.unwrap_or_else(|| match self.config.colors.len() {
            0 => 0xffffff,
            n => self.config.colors[rng.random_range(0..n)],
        });

        let p = &mut self.slots[slot as usize];
        p.pos = pos;
        p.vel = Vec2::ZERO;
        p.radius = radius;
        p.color = color;
        p.alpha = 1.0;
        p.scale = 1.0;
        p.active = true;
        p.running = None;

        Some(ParticleHandle {
            slot,
            generation: p.generation,
        })
    }

    /// Look up a live particle
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.slots
            .get(handle.slot as usize)
            .filter(|p| p.active && p.generation == handle.generation)
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|p| p.active && p.generation == handle.generation)
    }

    /// Attach an animation; the particle releases itself when it finishes
    pub fn animate(&mut self, handle: ParticleHandle, anim: Animation) -> bool {
        let Some(p) = self.get_mut(handle) else {
            return false;
        };
        if let Motion::Ballistic { velocity, .. } = anim.motion {
            p.vel = velocity;
        }
        p.running = Some(Running {
            anim,
            pos_from: p.pos,
            radius_from: p.radius,
            alpha_from: p.alpha,
            scale_from: p.scale,
        });
        true
    }

    /// Return a particle to the pool. Stale handles are ignored.
    pub fn release(&mut self, handle: ParticleHandle) -> bool {
        let slot = handle.slot as usize;
        match self.slots.get_mut(slot) {
            Some(p) if p.active && p.generation == handle.generation => {
                p.active = false;
                p.running = None;
                p.alpha = 0.0;
                p.vel = Vec2::ZERO;
                p.generation = p.generation.wrapping_add(1);
            }
            _ => return false,
        }

        // Swap the released slot with the last active one
        let idx = self.position[slot] as usize;
        let last = self.active_count - 1;
        self.order.swap(idx, last);
        self.position[self.order[idx] as usize] = idx as u32;
        self.position[self.order[last] as usize] = last as u32;
        self.active_count = last;
        true
    }

    /// Advance running animations, releasing the finished ones
    pub fn update(&mut self, dt: f32) -> usize {
        let mut released = 0;
        // Backwards so the slot swapped into `i` has already been stepped
        for i in (0..self.active_count).rev() {
            let slot = self.order[i];
            let p = &mut self.slots[slot as usize];
            if p.step(dt) {
                let handle = ParticleHandle {
                    slot,
                    generation: p.generation,
                };
                self.release(handle);
                released += 1;
            }
        }
        released
    }

    /// Active particles, for rendering
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.order[..self.active_count]
            .iter()
            .map(move |&slot| &self.slots[slot as usize])
    }

    /// Dispose every slot. The pool hands out nothing afterwards.
    pub fn cleanup(&mut self) {
        log::debug!(
            "{} pool cleanup ({} of {} active)",
            self.name,
            self.active_count,
            self.slots.len()
        );
        self.slots.clear();
        self.order.clear();
        self.position.clear();
        self.active_count = 0;
    }
}
