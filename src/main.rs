//! Sonar Archer entry point
//!
//! Native builds run a headless autoplay session and log what happens. The
//! browser build drives the library through `sonar_archer::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;

    use sonar_archer::sim::{Arena, FrameDriver, GameEvent, GameScene, TickInput};
    use sonar_archer::{QualityPreset, Settings, Tuning};

    #[derive(Parser, Debug)]
    #[command(about = "Run a headless Sonar Archer autoplay session", version)]
    pub struct Args {
        /// RNG seed for balloon placement and effects
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Simulated seconds to play
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,
        /// Simulated frame rate fed to the fixed-step driver
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Settings JSON (missing file means defaults)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Tuning JSON overriding the default level rules
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Quality preset: low, medium or high
        #[arg(long)]
        quality: Option<String>,
        /// Write the effective settings here before playing
        #[arg(long)]
        save_settings: Option<PathBuf>,
    }

    /// Seconds between shots
    const FIRE_COOLDOWN: f32 = 0.4;
    /// Seconds between sonar pulses while nothing is visible
    const SONAR_COOLDOWN: f32 = 1.2;
    /// Blind time before spending the super pulse
    const SUPER_SONAR_AFTER: f32 = 4.0;
    /// Relocate when a balloon gets this close
    const DANGER_DISTANCE: f32 = 80.0;

    /// Scripted player for the demo
    #[derive(Debug, Default)]
    struct Autopilot {
        fire_cooldown: f32,
        sonar_cooldown: f32,
        blind_time: f32,
    }

    impl Autopilot {
        fn decide(&mut self, scene: &GameScene, dt: f32) -> TickInput {
            self.fire_cooldown -= dt;
            self.sonar_cooldown -= dt;

            let mut input = TickInput::default();
            if !scene.level().is_active() {
                return input;
            }

            let player = scene.player().pos;
            let live = move || scene.balloons().iter().filter(|b| !b.is_destroyed());

            if live().any(|b| b.pos.distance(player) < DANGER_DISTANCE) {
                input.platform = safest_platform(scene);
            }

            let target = live()
                .filter(|b| !b.is_hidden())
                .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)))
                .map(|b| b.pos);

            match target {
                Some(pos) => {
                    self.blind_time = 0.0;
                    if self.fire_cooldown <= 0.0 {
                        input.fire = Some(pos);
                        self.fire_cooldown = FIRE_COOLDOWN;
                    }
                }
                None => {
                    self.blind_time += dt;
                    if self.blind_time > SUPER_SONAR_AFTER && scene.snapshot().super_sonar_available {
                        input.super_sonar = true;
                        self.blind_time = 0.0;
                    } else if self.sonar_cooldown <= 0.0 {
                        input.sonar = true;
                        self.sonar_cooldown = SONAR_COOLDOWN;
                    } else if self.blind_time > SONAR_COOLDOWN * 2.0 {
                        // Nothing in range from here, try the next platform
                        input.move_delta = if scene.player().platform_index + 1 < scene.platforms().len() {
                            1
                        } else {
                            -1
                        };
                        self.blind_time = 0.0;
                    }
                }
            }
            input
        }
    }

    /// Platform farthest from the nearest live balloon
    fn safest_platform(scene: &GameScene) -> Option<usize> {
        let clearance = |p: Vec2| {
            scene
                .balloons()
                .iter()
                .filter(|b| !b.is_destroyed())
                .map(|b| b.pos.distance(p))
                .fold(f32::INFINITY, f32::min)
        };
        scene
            .platforms()
            .iter()
            .max_by(|a, b| clearance(a.standing_point()).total_cmp(&clearance(b.standing_point())))
            .map(|p| p.index)
    }

    #[derive(Debug, Default)]
    struct Stats {
        shots: u32,
        pops: u32,
        levels_cleared: u32,
        game_overs: u32,
        best_level: u32,
    }

    fn load_settings(args: &Args) -> Result<Settings> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };
        if let Some(name) = &args.quality {
            let Some(preset) = QualityPreset::from_str(name) else {
                bail!("unknown quality preset '{name}' (expected low, medium or high)");
            };
            settings.apply_preset(preset);
        }
        Ok(settings)
    }

    pub fn run(args: Args) -> Result<()> {
        if args.fps <= 0.0 {
            bail!("--fps must be positive");
        }

        let settings = load_settings(&args)?;
        if let Some(path) = &args.save_settings {
            settings
                .save_file(path)
                .with_context(|| format!("saving settings to {}", path.display()))?;
        }
        let tuning = match &args.tuning {
            Some(path) => Tuning::load_file(path)?,
            None => Tuning::default(),
        };

        log::info!(
            "Playing {:.0}s at {:.0} fps, quality {}",
            args.seconds,
            args.fps,
            settings.quality.as_str()
        );

        let mut scene = GameScene::new(Arena::default(), tuning, settings, args.seed);
        let mut driver = FrameDriver::new();
        let mut pilot = Autopilot::default();
        let mut stats = Stats::default();

        scene.start_level();

        let frame_dt = 1.0 / args.fps;
        let frames = (args.seconds * args.fps).ceil() as u64;
        for _ in 0..frames {
            let input = pilot.decide(&scene, frame_dt);
            if input.fire.is_some() {
                stats.shots += 1;
            }
            driver.queue(&input);
            driver.advance(&mut scene, frame_dt);

            for event in scene.drain_events() {
                match event {
                    GameEvent::StateChanged(snapshot) => {
                        log::debug!("HUD {:?}", snapshot);
                        stats.best_level = stats.best_level.max(snapshot.level_number);
                    }
                    GameEvent::BalloonPopped { id, pos } => {
                        stats.pops += 1;
                        log::debug!("balloon {} popped at ({:.0}, {:.0})", id, pos.x, pos.y);
                    }
                    GameEvent::SonarPulse { kind, radius, .. } => {
                        log::debug!("{:?} sonar, radius {:.0}", kind, radius);
                    }
                    GameEvent::LevelComplete { level, message } => {
                        stats.levels_cleared += 1;
                        log::info!("{} (level {})", message, level);
                    }
                    GameEvent::GameOver(over) => {
                        stats.game_overs += 1;
                        log::info!("{}", over.message);
                        if over.level_failed {
                            scene.restart_level();
                        } else {
                            scene.reset_game();
                        }
                    }
                }
            }
        }

        scene.destroy();
        println!(
            "{} shots, {} pops, {} levels cleared, {} game overs, reached level {}",
            stats.shots, stats.pops, stats.levels_cleared, stats.game_overs, stats.best_level
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Sonar Archer (headless) starting...");
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sonar_archer::web::start, this is just to satisfy the compiler
}
