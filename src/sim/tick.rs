//! Fixed timestep simulation tick
//!
//! Turns discrete input into scene commands and advances the scene. The
//! [`FrameDriver`] feeds variable frame times through an accumulator so the
//! scene only ever sees `SIM_DT` steps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scene::GameScene;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Shoot at this playfield point (click/tap)
    pub fire: Option<Vec2>,
    /// Regular sonar pulse (space)
    pub sonar: bool,
    /// Once-per-level super pulse
    pub super_sonar: bool,
    /// Teleport to a platform slot (number keys)
    pub platform: Option<usize>,
    /// Step to the previous (-1) or next (+1) platform (arrow keys)
    pub move_delta: i32,
}

impl TickInput {
    /// Fold `next` into this input without losing one-shot presses.
    /// A later shot replaces an earlier one, target included.
    pub fn merge(&mut self, next: &TickInput) {
        if next.fire.is_some() {
            self.fire = next.fire;
        }
        self.sonar |= next.sonar;
        self.super_sonar |= next.super_sonar;
        if next.platform.is_some() {
            self.platform = next.platform;
        }
        if next.move_delta != 0 {
            self.move_delta = next.move_delta;
        }
    }

    /// Drop every command after a step has used them
    pub fn clear_one_shots(&mut self) {
        *self = TickInput::default();
    }
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut GameScene, input: &TickInput, dt: f32) {
    // Move first so shots and pulses leave from the new platform
    if let Some(index) = input.platform {
        scene.move_player_to_platform(index);
    }
    if input.move_delta != 0 {
        scene.move_player_relative(input.move_delta.signum());
    }

    if let Some(target) = input.fire {
        scene.fire(target);
    }
    // A refused super pulse still lets a regular press through
    let super_fired = input.super_sonar && scene.activate_super_sonar();
    if input.sonar && !super_fired {
        scene.activate_sonar();
    }

    scene.update(dt);
}

/// Variable frame time to fixed steps
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
    input: TickInput,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input for the next step
    pub fn queue(&mut self, input: &TickInput) {
        self.input.merge(input);
    }

    /// Run as many fixed steps as `frame_dt` covers; returns the step count
    pub fn advance(&mut self, scene: &mut GameScene, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(scene, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::trace!("dropping {:.4}s of backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }
        substeps
    }

    /// Leftover fraction of a step, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::level::LevelPhase;
    use crate::sim::scene::{Arena, GameEvent};
    use crate::sim::sonar::SonarKind;
    use crate::tuning::{LevelRules, Tuning};

    fn scene() -> GameScene {
        let mut scene = GameScene::new(Arena::default(), Tuning::stationary(), Settings::default(), 99);
        scene.start_level();
        scene.drain_events();
        scene
    }

    fn empty_scene() -> GameScene {
        let tuning = Tuning {
            levels: LevelRules {
                base_balloons: 0,
                ..LevelRules::default()
            },
            ..Tuning::stationary()
        };
        let mut scene = GameScene::new(Arena::default(), tuning, Settings::default(), 99);
        scene.start_level();
        scene.drain_events();
        scene
    }

    #[test]
    fn test_tick_fire() {
        let mut scene = scene();
        let input = TickInput {
            fire: Some(Vec2::new(150.0, 0.0)),
            ..Default::default()
        };
        tick(&mut scene, &input, SIM_DT);
        assert_eq!(scene.snapshot().arrows_left, 49);
        assert_eq!(scene.arrows().len(), 1);

        // Without fire nothing new launches
        tick(&mut scene, &TickInput::default(), SIM_DT);
        assert_eq!(scene.snapshot().arrows_left, 49);
    }

    #[test]
    fn test_tick_moves_before_firing() {
        let mut scene = empty_scene();
        let input = TickInput {
            fire: Some(Vec2::new(400.0, 0.0)),
            platform: Some(3),
            ..Default::default()
        };
        tick(&mut scene, &input, 0.0);
        let origin = scene.platforms()[3].standing_point();
        assert_eq!(scene.arrows()[0].pos, origin);
    }

    #[test]
    fn test_tick_move_delta() {
        let mut scene = scene();
        let input = TickInput {
            move_delta: 5,
            ..Default::default()
        };
        tick(&mut scene, &input, SIM_DT);
        assert_eq!(scene.player().platform_index, 1);
    }

    #[test]
    fn test_tick_super_sonar_takes_precedence() {
        let mut scene = scene();
        let input = TickInput {
            sonar: true,
            super_sonar: true,
            ..Default::default()
        };
        tick(&mut scene, &input, SIM_DT);
        let pulse = scene.sonar().pulse().unwrap();
        assert_eq!(pulse.max_radius, 400.0);
        assert!(!scene.snapshot().super_sonar_available);
    }

    #[test]
    fn test_tick_sonar_falls_back_after_super_used() {
        let mut scene = scene();
        assert!(scene.activate_super_sonar());
        scene.drain_events();

        let input = TickInput {
            sonar: true,
            super_sonar: true,
            ..Default::default()
        };
        tick(&mut scene, &input, SIM_DT);
        let pulse = scene.sonar().pulse().unwrap();
        assert_eq!(pulse.max_radius, 200.0);
        assert!(scene.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::SonarPulse {
                kind: SonarKind::Normal,
                ..
            }
        )));
    }

    #[test]
    fn test_driver_fixed_steps() {
        let mut scene = scene();
        let mut driver = FrameDriver::new();

        assert_eq!(driver.advance(&mut scene, SIM_DT * 0.5), 0);
        assert_eq!(driver.advance(&mut scene, SIM_DT * 0.6), 1);
        assert!(driver.alpha() < 1.0);

        // Long frames clamp and cap
        assert_eq!(driver.advance(&mut scene, 5.0), MAX_SUBSTEPS);
        assert!(driver.alpha() < 1.0);
    }

    #[test]
    fn test_driver_one_shots_fire_once() {
        let mut scene = scene();
        let mut driver = FrameDriver::new();
        driver.queue(&TickInput {
            fire: Some(Vec2::new(150.0, 0.0)),
            ..Default::default()
        });

        driver.advance(&mut scene, SIM_DT * 4.0);
        assert_eq!(scene.snapshot().arrows_left, 49);

        let fired = scene
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::StateChanged(_)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_driver_merges_queued_presses() {
        let mut driver = FrameDriver::new();
        driver.queue(&TickInput {
            fire: Some(Vec2::new(1.0, 2.0)),
            ..Default::default()
        });
        driver.queue(&TickInput {
            sonar: true,
            ..Default::default()
        });
        assert_eq!(driver.input.fire, Some(Vec2::new(1.0, 2.0)));
        assert!(driver.input.sonar);

        // The newest shot wins
        driver.queue(&TickInput {
            fire: Some(Vec2::new(10.0, 20.0)),
            ..Default::default()
        });
        assert_eq!(driver.input.fire, Some(Vec2::new(10.0, 20.0)));

        driver.input.clear_one_shots();
        assert_eq!(driver.input, TickInput::default());
    }

    #[test]
    fn test_driver_queued_shot_keeps_its_target() {
        let mut scene = empty_scene();
        let mut driver = FrameDriver::new();
        let player = scene.player().pos;

        // Straight right of the player, then an unrelated press in the same frame
        driver.queue(&TickInput {
            fire: Some(Vec2::new(700.0, player.y)),
            ..Default::default()
        });
        driver.queue(&TickInput {
            sonar: true,
            ..Default::default()
        });
        assert_eq!(driver.advance(&mut scene, SIM_DT), 1);

        let arrow = &scene.arrows()[0];
        assert!(arrow.vel.x > 0.0, "arrow flew {:?}", arrow.vel);
        assert!(arrow.vel.y.abs() < 1e-3);
        assert!(scene.sonar().pulse().is_some());
    }

    #[test]
    fn test_ticks_are_inert_before_start() {
        let mut scene = GameScene::new(Arena::default(), Tuning::default(), Settings::default(), 1);
        let input = TickInput {
            fire: Some(Vec2::new(400.0, 300.0)),
            sonar: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut scene, &input, SIM_DT);
        }
        assert_eq!(scene.phase(), LevelPhase::Idle);
        assert!(scene.drain_events().is_empty());
    }
}
