//! Browser facade
//!
//! A thin wasm-bindgen wrapper that lets a JavaScript presentation layer
//! drive the scene. Structured data crosses the boundary as JSON strings.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{Arena, Arrow, Balloon, FrameDriver, GameScene, Platform, Player, TickInput};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Sonar Archer (web) starting...");
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[derive(Serialize)]
struct PulseView {
    x: f32,
    y: f32,
    radius: f32,
    alpha: f32,
}

#[derive(Serialize)]
struct ParticleView {
    layer: &'static str,
    x: f32,
    y: f32,
    radius: f32,
    color: u32,
    alpha: f32,
    scale: f32,
}

/// Everything a frame needs to draw
#[derive(Serialize)]
struct RenderView<'a> {
    player: &'a Player,
    /// Visible balloons only
    balloons: Vec<&'a Balloon>,
    platforms: &'a [Platform],
    arrows: &'a [Arrow],
    sonar: Option<PulseView>,
    /// Back to front
    particles: Vec<ParticleView>,
    shake: [f32; 2],
}

#[wasm_bindgen]
pub struct WebGame {
    scene: GameScene,
    driver: FrameDriver,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a game at level 1. Both arguments are optional JSON documents.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(js_error)?,
            None => Settings::default(),
        };
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

        let mut scene = GameScene::new(Arena::default(), tuning, settings, seed);
        scene.start_level();
        Ok(WebGame {
            scene,
            driver: FrameDriver::new(),
        })
    }

    /// Advance by one animation frame (seconds)
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.driver.advance(&mut self.scene, dt)
    }

    /// Shoot toward a playfield point on the next step
    pub fn fire(&mut self, x: f32, y: f32) {
        self.queue(TickInput {
            fire: Some(Vec2::new(x, y)),
            ..Default::default()
        });
    }

    pub fn sonar(&mut self) {
        self.queue(TickInput {
            sonar: true,
            ..Default::default()
        });
    }

    pub fn super_sonar(&mut self) {
        self.queue(TickInput {
            super_sonar: true,
            ..Default::default()
        });
    }

    pub fn move_to_platform(&mut self, index: usize) {
        self.queue(TickInput {
            platform: Some(index),
            ..Default::default()
        });
    }

    pub fn move_relative(&mut self, delta: i32) {
        self.queue(TickInput {
            move_delta: delta,
            ..Default::default()
        });
    }

    /// "Try again" after running out of arrows
    pub fn restart_level(&mut self) {
        self.scene.restart_level();
    }

    pub fn new_game(&mut self) {
        self.scene.reset_game();
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.scene.snapshot()).map_err(js_error)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.scene.drain_events()).map_err(js_error)
    }

    pub fn render_json(&mut self) -> Result<String, JsValue> {
        let shake = self.scene.shake_offset();
        let scene = &self.scene;

        let particles = scene
            .flare()
            .pools()
            .into_iter()
            .flat_map(|pool| {
                let layer = pool.name();
                pool.iter_active().map(move |p| ParticleView {
                    layer,
                    x: p.pos.x,
                    y: p.pos.y,
                    radius: p.radius,
                    color: p.color,
                    alpha: p.alpha,
                    scale: p.scale,
                })
            })
            .collect();

        let view = RenderView {
            player: scene.player(),
            balloons: scene
                .balloons()
                .iter()
                .filter(|b| !b.is_hidden() && !b.is_destroyed())
                .collect(),
            platforms: scene.platforms(),
            arrows: scene.arrows(),
            sonar: scene.sonar().pulse().map(|p| PulseView {
                x: p.origin.x,
                y: p.origin.y,
                radius: p.radius,
                alpha: p.alpha,
            }),
            particles,
            shake: [shake.x, shake.y],
        };
        serde_json::to_string(&view).map_err(js_error)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.scene.settings().to_json().map_err(js_error)
    }
}

impl WebGame {
    fn queue(&mut self, input: TickInput) {
        self.driver.queue(&input);
    }
}
