//! # Sprite Engine
//!
//! A small 2D game engine: a fixed-timestep game loop, an entity world with
//! hierarchical transforms, a batching sprite renderer and sprite animation
//! state machines, driven by a scene stack and an input-mapping layer.
//!
//! ## Features
//!
//! - **Game Loop**: fixed or variable timestep with render interpolation
//! - **Entity World**: parent/child transforms, sprite, animation and script components
//! - **Sprite Batching**: one draw call per run of sprites sharing a texture
//! - **Animation**: clips, sprite sheets and trigger-driven state machines
//! - **Scenes**: named scenes with deferred switch/push/pop transitions
//! - **Headless**: window, GPU, clock and input are host-supplied traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_engine::prelude::*;
//!
//! struct Game {
//!     scenes: SceneManager,
//! }
//!
//! impl Application for Game {
//!     fn update(&mut self, delta_time: f32) -> Result<(), AppError> {
//!         self.scenes.update(delta_time)?;
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, _alpha: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Window {
//!     frames_left: u32,
//! }
//!
//! impl WindowSurface for Window {
//!     fn should_close(&self) -> bool {
//!         self.frames_left == 0
//!     }
//!
//!     fn present(&mut self) {
//!         self.frames_left -= 1;
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     let config = EngineConfig::default();
//!     config.init_logging();
//!
//!     let mut level = WorldScene::new("level", Camera2D::from_config(&config.camera)?);
//!     let ship = level.world_mut().create_entity("ship");
//!     level
//!         .world_mut()
//!         .add_component(ship, ScriptComponent::new(MovementScript::new(50.0, Vec2::new(1.0, 0.0))))
//!         .map_err(AppError::from)?;
//!
//!     let mut scenes = SceneManager::new();
//!     scenes.register_scene(level).map_err(AppError::from)?;
//!     scenes.switch_to_scene("level").map_err(AppError::from)?;
//!
//!     let mut game = Game { scenes };
//!     GameLoop::from_engine_config(&config)?.run_application(&mut game, &mut Window { frames_left: 120 })
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod foundation;
pub mod platform;
pub mod config;
pub mod events;

// Subsystems
pub mod animation;
pub mod assets;
pub mod ecs;
pub mod input;
pub mod render;
pub mod scene;

pub mod application;
pub mod game_loop;

pub use application::{AppError, Application};
pub use game_loop::{EngineError, GameLoop, StopHandle};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{
            AnimationBuilder, AnimationClip, AnimationError, AnimationState, AnimationStateMachine,
            AnimationTransition, Frame, SpriteSheet,
        },
        core::config::{EngineConfig, LoopConfig, TimestepMode},
        ecs::{
            AnimationComponent, Component, ComponentKind, EcsError, Entity, EntityId, MovementScript, Script,
            ScriptComponent, ScriptContext, SpriteComponent, Transform, World,
        },
        foundation::{
            math::{Mat4, Vec2, Vec3, Vec4},
            time::{Stopwatch, TimeManager, Timer},
        },
        input::{InputManager, InputMapping, KeyCode, MouseButton},
        platform::{ClockSource, InputSource, ManualClock, SystemClock, WindowSurface},
        render::{Camera2D, RenderBackend, Sprite, SpriteBatch, SpriteRenderer, Texture, TextureRegion},
        scene::{Scene, SceneError, SceneManager, SceneState, WorldScene},
        AppError, Application, EngineError, GameLoop, StopHandle,
    };
}
