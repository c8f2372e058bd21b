//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timed behavior goes through the scheduler, never wall-clock time

pub mod arrows;
pub mod entities;
pub mod flare;
pub mod level;
pub mod pool;
pub mod scene;
pub mod schedule;
pub mod sonar;
pub mod tick;
pub mod tween;

pub use arrows::{Arrow, ArrowReport, ArrowSystem};
pub use entities::{Balloon, Facing, FacingSprite, Platform, Player};
pub use flare::{FlareReport, FlareSystem, PoolStats, ScreenShake};
pub use level::{LevelConfig, LevelManager, LevelPhase, level_config};
pub use pool::{Animation, Motion, Particle, ParticleHandle, ParticlePool, PoolConfig};
pub use scene::{Arena, GameEvent, GameOver, GameScene, UiSnapshot};
pub use schedule::{Scheduler, TimerId};
pub use sonar::{SonarKind, SonarPulse, SonarReport, SonarSystem};
pub use tick::{FrameDriver, TickInput, tick};
pub use tween::{Easing, Tween};
