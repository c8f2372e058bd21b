//! The playable scene
//!
//! `GameScene` owns the level state, the entities and every system, and is
//! the only thing a presentation layer talks to: commands in, drained events
//! and a polled [`UiSnapshot`] out.
//!
//! Delayed transitions (auto-advance, the out-of-arrows grace period, the
//! staged collision sequence) go through a [`Scheduler`]. Each task records
//! the level epoch it was scheduled in and is dropped if that level has
//! been torn down since.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrows::{Arrow, ArrowSystem};
use super::entities::{Balloon, Platform, Player};
use super::flare::FlareSystem;
use super::level::{LevelManager, LevelPhase};
use super::schedule::{Scheduler, TimerId};
use super::sonar::{SonarKind, SonarSystem};
use crate::Bounds;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

pub const ROOM_CLEARED_MESSAGE: &str = "Room Cleared!";
pub const OUT_OF_ARROWS_MESSAGE: &str = "Out of Arrows! Try Again?";
pub const CAUGHT_MESSAGE: &str = "Caught by a Balloon!";

/// Static geometry of the room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Bounds,
    /// Platform centers, in slot order
    pub platforms: Vec<Vec2>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            platforms: PLATFORM_POSITIONS
                .iter()
                .map(|&(x, y)| Vec2::new(x, y))
                .collect(),
        }
    }
}

/// HUD state pushed after every counter change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub balloons_remaining: u32,
    pub arrows_left: u32,
    pub level_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub super_sonar_available: bool,
}

/// End-of-run notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub message: String,
    /// True offers "retry this level", false offers "new game"
    pub level_failed: bool,
}

/// Outbound notifications, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged(UiSnapshot),
    LevelComplete { level: u32, message: String },
    GameOver(GameOver),
    BalloonPopped { id: u32, pos: Vec2 },
    SonarPulse { kind: SonarKind, origin: Vec2, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneTask {
    AdvanceLevel,
    FailureCheck,
    CollisionFlare,
    CollisionGameOver,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    epoch: u64,
    task: SceneTask,
}

/// Everything in play
#[derive(Debug, Clone)]
pub struct GameScene {
    bounds: Bounds,
    /// Balloons spawn and drift inside this
    spawn_area: Bounds,
    tuning: Tuning,
    settings: Settings,
    rng: Pcg32,
    level: LevelManager,
    balloons: Vec<Balloon>,
    platforms: Vec<Platform>,
    player: Player,
    arrows: ArrowSystem,
    sonar: SonarSystem,
    flare: FlareSystem,
    tasks: Scheduler<Scheduled>,
    /// Pending out-of-arrows check, if armed
    failure_check: Option<TimerId>,
    /// Bumped on every level teardown
    epoch: u64,
    next_balloon_id: u32,
    message: Option<String>,
    events: Vec<GameEvent>,
}

impl GameScene {
    /// Build an idle scene; call [`GameScene::start_level`] to begin.
    ///
    /// # Panics
    /// If `arena` has no platforms.
    pub fn new(arena: Arena, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        assert!(!arena.platforms.is_empty(), "arena needs at least one platform");

        let platforms: Vec<Platform> = arena
            .platforms
            .iter()
            .enumerate()
            .map(|(i, &pos)| Platform::new(i, pos))
            .collect();
        let player = Player::new(&platforms);

        log::info!(
            "Scene created: {}x{} arena, {} platforms, seed {}",
            arena.bounds.size().x,
            arena.bounds.size().y,
            platforms.len(),
            seed
        );

        Self {
            bounds: arena.bounds,
            spawn_area: arena.bounds.inset(BALLOON_SPAWN_MARGIN),
            arrows: ArrowSystem::new(tuning.arrow_speed, tuning.hit_distance),
            level: LevelManager::new(tuning.levels.clone()),
            flare: FlareSystem::new(&settings, seed.wrapping_add(1)),
            sonar: SonarSystem::new(),
            tuning,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            balloons: Vec::new(),
            platforms,
            player,
            tasks: Scheduler::new(),
            failure_check: None,
            epoch: 0,
            next_balloon_id: 1,
            message: None,
            events: Vec::new(),
        }
    }

    // --- Level lifecycle -------------------------------------------------

    /// (Re)start the current level with fresh balloons
    pub fn start_level(&mut self) {
        self.begin_level(LevelManager::start_level);
    }

    /// Replay the current level from scratch
    pub fn restart_level(&mut self) {
        self.begin_level(LevelManager::reset_level);
    }

    pub fn next_level(&mut self) {
        self.begin_level(LevelManager::next_level);
    }

    /// Back to level 1, player on the first platform
    pub fn reset_game(&mut self) {
        self.player.teleport_to(0, &self.platforms);
        self.begin_level(LevelManager::reset_game);
    }

    fn begin_level(&mut self, enter: fn(&mut LevelManager)) {
        self.teardown();
        enter(&mut self.level);
        self.spawn_balloons();
        self.push_snapshot();
    }

    /// Drop everything that belongs to the running level
    fn teardown(&mut self) {
        self.epoch += 1;
        self.tasks.clear();
        self.failure_check = None;
        self.arrows.clear();
        self.sonar.cleanup();
        self.balloons.clear();
        for platform in &mut self.platforms {
            platform.hide();
        }
        self.message = None;
    }

    fn spawn_balloons(&mut self) {
        let count = self.level.config().balloon_count;
        for _ in 0..count {
            let pos = self.random_spawn_point();
            let heading = self.rng.random_range(0.0f32..std::f32::consts::TAU);
            let vel = crate::direction(heading) * self.tuning.balloon_drift_speed;

            let id = self.next_balloon_id;
            self.next_balloon_id += 1;
            self.balloons.push(Balloon::new(id, pos, vel));
        }
        log::debug!("spawned {} balloons", count);
    }

    /// Uniform point in the spawn area, re-rolled while too close to the player
    fn random_spawn_point(&mut self) -> Vec2 {
        let area = self.spawn_area;
        let mut pos = area.min;
        for _ in 0..BALLOON_SPAWN_ATTEMPTS {
            pos = Vec2::new(
                self.rng.random_range(area.min.x..=area.max.x),
                self.rng.random_range(area.min.y..=area.max.y),
            );
            if pos.distance(self.player.pos) >= BALLOON_SPAWN_CLEARANCE {
                break;
            }
        }
        pos
    }

    // --- Player commands -------------------------------------------------

    /// Shoot an arrow at `target`; false when not playing or out of arrows
    pub fn fire(&mut self, target: Vec2) -> bool {
        if !self.level.is_active() || self.level.arrows_left() == 0 {
            return false;
        }

        self.level.arrow_shot();
        self.player.aim_at(target);
        self.arrows.shoot(self.player.pos, target);
        self.push_snapshot();

        if self.level.is_level_failed() {
            self.arm_failure_check();
        }
        true
    }

    pub fn activate_sonar(&mut self) -> bool {
        if !self.level.is_active() {
            return false;
        }
        let radius = self.level.config().sonar_radius;
        self.emit_pulse(radius, SonarKind::Normal);
        true
    }

    /// Once per level
    pub fn activate_super_sonar(&mut self) -> bool {
        if !self.level.is_active() || !self.level.try_use_super_sonar() {
            return false;
        }
        let radius = self.level.config().super_sonar_radius;
        self.emit_pulse(radius, SonarKind::Super);
        self.push_snapshot();
        true
    }

    fn emit_pulse(&mut self, radius: f32, kind: SonarKind) {
        let origin = self.player.pos;
        self.sonar
            .activate(origin, &mut self.balloons, &mut self.platforms, radius, kind);
        self.events.push(GameEvent::SonarPulse {
            kind,
            origin,
            radius,
        });
    }

    pub fn move_player_to_platform(&mut self, index: usize) -> bool {
        self.level.is_active() && self.player.teleport_to(index, &self.platforms)
    }

    pub fn move_player_relative(&mut self, delta: i32) -> bool {
        self.level.is_active() && self.player.move_relative(delta, &self.platforms)
    }

    // --- Simulation ------------------------------------------------------

    /// Advance the scene by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for Scheduled { epoch, task } in self.tasks.advance(dt) {
            if epoch != self.epoch {
                log::debug!("dropping {:?} from torn-down level", task);
                continue;
            }
            self.run_task(task);
        }

        if self.level.is_active() {
            for balloon in &mut self.balloons {
                balloon.drift(dt, &self.spawn_area);
            }
            self.update_arrows(dt);
        }
        if self.level.is_active() {
            self.check_player_proximity();
        }

        self.sonar.update(dt, &mut self.balloons, &mut self.platforms);
        self.flare.update(dt);
    }

    fn update_arrows(&mut self, dt: f32) {
        let mut popped = Vec::new();
        self.arrows
            .update(dt, &mut self.balloons, &self.bounds, |balloon| {
                balloon.destroy();
                popped.push((balloon.id, balloon.pos));
            });

        for (id, pos) in popped {
            self.on_balloon_hit(id, pos);
        }
    }

    fn on_balloon_hit(&mut self, id: u32, pos: Vec2) {
        self.flare.create_flare(pos);
        self.flare.add_screen_shake(DEFAULT_SHAKE_INTENSITY);
        self.level.balloon_popped();
        self.events.push(GameEvent::BalloonPopped { id, pos });
        self.push_snapshot();

        if self.level.is_active() && self.level.is_level_complete() {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        self.level.mark_complete();
        self.cancel_failure_check();

        let message = ROOM_CLEARED_MESSAGE.to_string();
        self.message = Some(message.clone());
        self.push_snapshot();
        self.events.push(GameEvent::LevelComplete {
            level: self.level.level_number(),
            message,
        });
        log::info!(
            "Level {} cleared with {} arrows left",
            self.level.level_number(),
            self.level.arrows_left()
        );

        if self.settings.auto_advance {
            self.schedule(LEVEL_ADVANCE_DELAY, SceneTask::AdvanceLevel);
        }
    }

    fn check_player_proximity(&mut self) {
        let player = self.player.pos;
        let caught = self
            .balloons
            .iter()
            .any(|b| !b.is_destroyed() && b.pos.distance(player) < PLAYER_COLLISION_DISTANCE);
        if !caught {
            return;
        }

        log::info!("Player caught on level {}", self.level.level_number());
        self.level.mark_failed();
        self.cancel_failure_check();
        self.schedule(COLLISION_FLARE_DELAY, SceneTask::CollisionFlare);
    }

    fn check_out_of_arrows(&mut self) {
        if !self.level.is_active() || !self.level.is_level_failed() {
            return;
        }
        // A last arrow may still pop the last balloon
        if !self.arrows.is_empty() {
            self.arm_failure_check();
            return;
        }

        self.level.mark_failed();
        log::info!(
            "Level {} failed with {} balloons left",
            self.level.level_number(),
            self.level.balloons_remaining()
        );
        self.events.push(GameEvent::GameOver(GameOver {
            message: OUT_OF_ARROWS_MESSAGE.to_string(),
            level_failed: true,
        }));
    }

    fn run_task(&mut self, task: SceneTask) {
        match task {
            SceneTask::AdvanceLevel => {
                if self.level.phase() == LevelPhase::Complete {
                    self.next_level();
                }
            }
            SceneTask::FailureCheck => {
                self.failure_check = None;
                self.check_out_of_arrows();
            }
            SceneTask::CollisionFlare => {
                if self.level.phase() == LevelPhase::Failed {
                    let pos = self.player.pos;
                    self.flare.create_flare(pos);
                    self.flare.add_screen_shake(COLLISION_SHAKE_INTENSITY);
                    self.schedule(COLLISION_GAME_OVER_DELAY, SceneTask::CollisionGameOver);
                }
            }
            SceneTask::CollisionGameOver => {
                if self.level.phase() == LevelPhase::Failed {
                    self.events.push(GameEvent::GameOver(GameOver {
                        message: CAUGHT_MESSAGE.to_string(),
                        level_failed: false,
                    }));
                }
            }
        }
    }

    fn schedule(&mut self, delay: f32, task: SceneTask) -> TimerId {
        let epoch = self.epoch;
        self.tasks.schedule(delay, Scheduled { epoch, task })
    }

    /// At most one out-of-arrows check is pending
    fn arm_failure_check(&mut self) {
        if self.failure_check.is_some_and(|id| self.tasks.is_pending(id)) {
            return;
        }
        self.failure_check = Some(self.schedule(FAILURE_GRACE_DELAY, SceneTask::FailureCheck));
    }

    fn cancel_failure_check(&mut self) {
        if let Some(id) = self.failure_check.take() {
            self.tasks.cancel(id);
        }
    }

    /// Release pooled effects and drop the running level
    pub fn destroy(&mut self) {
        self.teardown();
        self.flare.destroy();
        self.events.clear();
    }

    // --- Outputs ---------------------------------------------------------

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            balloons_remaining: self.level.balloons_remaining(),
            arrows_left: self.level.arrows_left(),
            level_number: self.level.level_number(),
            message: self.message.clone(),
            super_sonar_available: self.level.super_sonar_available(),
        }
    }

    fn push_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.events.push(GameEvent::StateChanged(snapshot));
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera offset for this frame
    pub fn shake_offset(&mut self) -> Vec2 {
        self.flare.shake_offset(self.bounds.size())
    }

    pub fn phase(&self) -> LevelPhase {
        self.level.phase()
    }

    pub fn level(&self) -> &LevelManager {
        &self.level
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn arrows(&self) -> &[Arrow] {
        self.arrows.arrows()
    }

    pub fn sonar(&self) -> &SonarSystem {
        &self.sonar
    }

    pub fn flare(&self) -> &FlareSystem {
        &self.flare
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::LevelRules;

    fn scene_with(rules: LevelRules) -> GameScene {
        let tuning = Tuning {
            levels: rules,
            ..Tuning::stationary()
        };
        GameScene::new(Arena::default(), tuning, Settings::default(), 7)
    }

    fn one_balloon() -> GameScene {
        let mut scene = scene_with(LevelRules {
            base_balloons: 1,
            ..LevelRules::default()
        });
        scene.start_level();
        scene.balloons[0].pos = Vec2::new(400.0, 130.0);
        scene.drain_events();
        scene
    }

    fn run(scene: &mut GameScene, seconds: f32) {
        let steps = (seconds / SIM_DT).ceil() as u32;
        for _ in 0..steps {
            scene.update(SIM_DT);
        }
    }

    fn game_overs(events: &[GameEvent]) -> Vec<GameOver> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver(g) => Some(g.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut scene = scene_with(LevelRules::default());
        assert_eq!(scene.phase(), LevelPhase::Idle);
        assert!(!scene.fire(Vec2::new(400.0, 300.0)));
        assert!(!scene.activate_sonar());
        assert!(!scene.activate_super_sonar());
        assert!(!scene.move_player_relative(1));
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn test_start_level_spawns_hidden_balloons_away_from_player() {
        let mut scene = scene_with(LevelRules::default());
        scene.start_level();
        assert_eq!(scene.balloons().len(), 3);

        let area = Bounds::default().inset(BALLOON_SPAWN_MARGIN);
        for b in scene.balloons() {
            assert!(b.is_hidden());
            assert!(area.contains(b.pos));
            assert!(b.pos.distance(scene.player().pos) >= BALLOON_SPAWN_CLEARANCE);
        }

        let events = scene.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::StateChanged(UiSnapshot {
                balloons_remaining: 3,
                arrows_left: 50,
                level_number: 1,
                message: None,
                super_sonar_available: true,
            })]
        );
    }

    #[test]
    fn test_fire_decrements_and_reports() {
        let mut scene = one_balloon();
        assert!(scene.fire(Vec2::new(150.0, 0.0)));
        assert_eq!(scene.arrows().len(), 1);
        assert_eq!(scene.snapshot().arrows_left, 49);
        assert!(matches!(
            scene.drain_events().as_slice(),
            [GameEvent::StateChanged(s)] if s.arrows_left == 49
        ));
    }

    #[test]
    fn test_hit_completes_level_and_auto_advances() {
        let mut scene = one_balloon();
        assert!(scene.fire(Vec2::new(400.0, 130.0)));
        run(&mut scene, 0.6);

        assert_eq!(scene.phase(), LevelPhase::Complete);
        assert!(scene.balloons()[0].is_destroyed());
        assert!(scene.flare().pool_stats().explosion_active > 0);
        assert_eq!(scene.snapshot().message.as_deref(), Some(ROOM_CLEARED_MESSAGE));

        let events = scene.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BalloonPopped { .. })));
        assert!(events.contains(&GameEvent::LevelComplete {
            level: 1,
            message: ROOM_CLEARED_MESSAGE.to_string(),
        }));

        // Commands are ignored while the room is cleared
        assert!(!scene.fire(Vec2::ZERO));

        run(&mut scene, LEVEL_ADVANCE_DELAY);
        assert!(scene.level().is_active());
        assert_eq!(scene.level().level_number(), 2);
        assert_eq!(scene.balloons().len(), 2);
        assert!(scene.snapshot().message.is_none());
    }

    #[test]
    fn test_no_auto_advance_when_disabled() {
        let tuning = Tuning {
            levels: LevelRules {
                base_balloons: 1,
                ..LevelRules::default()
            },
            ..Tuning::stationary()
        };
        let settings = Settings {
            auto_advance: false,
            ..Settings::default()
        };
        let mut scene = GameScene::new(Arena::default(), tuning, settings, 7);
        scene.start_level();
        scene.balloons[0].pos = Vec2::new(400.0, 130.0);
        scene.fire(Vec2::new(400.0, 130.0));
        run(&mut scene, 3.0);
        assert_eq!(scene.phase(), LevelPhase::Complete);
        assert_eq!(scene.level().level_number(), 1);
    }

    #[test]
    fn test_restart_drops_pending_advance() {
        let mut scene = one_balloon();
        scene.fire(Vec2::new(400.0, 130.0));
        run(&mut scene, 0.6);
        assert_eq!(scene.phase(), LevelPhase::Complete);

        scene.restart_level();
        run(&mut scene, LEVEL_ADVANCE_DELAY + 0.5);
        assert_eq!(scene.level().level_number(), 1);
        assert!(scene.level().is_active());
    }

    #[test]
    fn test_out_of_arrows_waits_for_arrows_in_flight() {
        let mut scene = scene_with(LevelRules {
            base_balloons: 1,
            base_arrows: 1,
            ..LevelRules::default()
        });
        scene.start_level();
        scene.balloons[0].pos = Vec2::new(700.0, 500.0);
        scene.drain_events();

        // Long miss along the top edge: 650 px takes 1.3 s
        scene.fire(Vec2::new(800.0, 130.0));
        assert!(!scene.fire(Vec2::new(800.0, 130.0)));
        run(&mut scene, FAILURE_GRACE_DELAY + 0.05);
        assert!(scene.level().is_active());
        assert!(game_overs(&scene.drain_events()).is_empty());
        // Re-armed for the arrow still in flight
        assert!(scene.failure_check.is_some_and(|id| scene.tasks.is_pending(id)));

        run(&mut scene, FAILURE_GRACE_DELAY);
        assert_eq!(scene.phase(), LevelPhase::Failed);
        assert_eq!(
            game_overs(&scene.drain_events()),
            vec![GameOver {
                message: OUT_OF_ARROWS_MESSAGE.to_string(),
                level_failed: true,
            }]
        );
    }

    #[test]
    fn test_last_arrow_can_still_clear() {
        let mut scene = scene_with(LevelRules {
            base_balloons: 1,
            base_arrows: 1,
            ..LevelRules::default()
        });
        scene.start_level();
        scene.balloons[0].pos = Vec2::new(400.0, 130.0);
        scene.fire(Vec2::new(400.0, 130.0));
        run(&mut scene, 3.0);

        let events = scene.drain_events();
        assert!(game_overs(&events).is_empty());
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));
    }

    #[test]
    fn test_clearing_cancels_pending_failure_check() {
        let mut scene = scene_with(LevelRules {
            base_balloons: 1,
            base_arrows: 1,
            ..LevelRules::default()
        });
        scene.start_level();
        scene.balloons[0].pos = Vec2::new(400.0, 130.0);
        scene.fire(Vec2::new(400.0, 130.0));

        let check = scene.failure_check.unwrap();
        assert!(scene.tasks.is_pending(check));

        // The arrow reaches the balloon well inside the grace delay
        run(&mut scene, 0.6);
        assert_eq!(scene.phase(), LevelPhase::Complete);
        assert!(!scene.tasks.is_pending(check));
        assert!(scene.failure_check.is_none());
        // Only the auto-advance remains
        assert_eq!(scene.tasks.len(), 1);
    }

    #[test]
    fn test_player_proximity_sequence() {
        let mut scene = one_balloon();
        scene.balloons[0].pos = scene.player().pos + Vec2::new(10.0, 0.0);

        scene.update(SIM_DT);
        assert_eq!(scene.phase(), LevelPhase::Failed);
        assert_eq!(scene.flare().pool_stats().flash_active, 0);

        run(&mut scene, COLLISION_FLARE_DELAY + 0.02);
        assert!(scene.flare().pool_stats().explosion_active > 0);
        assert!(scene.flare().screen_shake().is_active());
        assert_eq!(scene.flare().screen_shake().intensity, COLLISION_SHAKE_INTENSITY);
        assert!(game_overs(&scene.drain_events()).is_empty());

        run(&mut scene, COLLISION_GAME_OVER_DELAY + 0.02);
        assert_eq!(
            game_overs(&scene.drain_events()),
            vec![GameOver {
                message: CAUGHT_MESSAGE.to_string(),
                level_failed: false,
            }]
        );
    }

    #[test]
    fn test_new_game_after_collision_cancels_sequence() {
        let mut scene = one_balloon();
        scene.balloons[0].pos = scene.player().pos;
        scene.update(SIM_DT);
        assert_eq!(scene.phase(), LevelPhase::Failed);

        scene.reset_game();
        run(&mut scene, 2.0);
        assert!(game_overs(&scene.drain_events()).is_empty());
        assert!(scene.level().is_active());
    }

    #[test]
    fn test_sonar_reveals_within_level_radius() {
        let mut scene = one_balloon();
        // Player stands at (150, 130); level 1 radius is 200
        scene.balloons[0].pos = Vec2::new(340.0, 130.0);
        assert!(scene.activate_sonar());
        assert!(!scene.balloons()[0].is_hidden());
        assert!(!scene.platforms()[0].is_hidden());
        assert!(scene.platforms()[1].is_hidden());

        assert_eq!(
            scene.drain_events(),
            vec![GameEvent::SonarPulse {
                kind: SonarKind::Normal,
                origin: Vec2::new(150.0, 130.0),
                radius: 200.0,
            }]
        );

        run(&mut scene, BALLOON_REVEAL_WINDOW + 0.05);
        assert!(scene.balloons()[0].is_hidden());
    }

    #[test]
    fn test_super_sonar_once_per_level() {
        let mut scene = one_balloon();
        scene.balloons[0].pos = Vec2::new(540.0, 130.0);
        assert!(scene.activate_super_sonar());
        assert!(!scene.balloons()[0].is_hidden());
        assert!(!scene.snapshot().super_sonar_available);
        assert!(!scene.activate_super_sonar());

        scene.restart_level();
        assert!(scene.snapshot().super_sonar_available);
        assert!(scene.activate_super_sonar());
    }

    #[test]
    fn test_teardown_hides_platforms() {
        let mut scene = one_balloon();
        scene.activate_sonar();
        assert!(!scene.platforms()[0].is_hidden());
        scene.restart_level();
        assert!(scene.platforms().iter().all(|p| p.is_hidden()));
        assert_eq!(scene.sonar().pending_reveals(), 0);
    }

    #[test]
    fn test_player_moves() {
        let mut scene = one_balloon();
        assert!(scene.move_player_to_platform(3));
        assert_eq!(scene.player().platform_index, 3);
        assert!(!scene.move_player_to_platform(9));
        assert!(scene.move_player_relative(-1));
        assert_eq!(scene.player().platform_index, 2);

        scene.reset_game();
        assert_eq!(scene.player().platform_index, 0);
    }

    #[test]
    fn test_balloon_ids_never_reused() {
        let mut scene = scene_with(LevelRules::default());
        scene.start_level();
        let first: Vec<u32> = scene.balloons().iter().map(|b| b.id).collect();
        scene.restart_level();
        let second: Vec<u32> = scene.balloons().iter().map(|b| b.id).collect();
        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[test]
    #[should_panic(expected = "at least one platform")]
    fn test_empty_arena_panics() {
        let arena = Arena {
            bounds: Bounds::default(),
            platforms: Vec::new(),
        };
        GameScene::new(arena, Tuning::default(), Settings::default(), 0);
    }
}
