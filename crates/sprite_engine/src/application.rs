//! Application trait and lifecycle management

use crate::animation::AnimationError;
use crate::assets::AssetError;
use crate::ecs::EcsError;
use crate::render::RenderError;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this to drive a game from [`GameLoop::run_application`](crate::game_loop::GameLoop::run_application).
pub trait Application {
    /// Called once before the first frame
    fn on_start(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Advance the simulation by `delta_time` seconds
    ///
    /// In fixed-timestep mode this is called zero or more times per frame
    /// with the configured step.
    fn update(&mut self, delta_time: f32) -> Result<(), AppError>;

    /// Draw the frame
    ///
    /// `alpha` is the fraction of a fixed step left in the accumulator, for
    /// interpolating between the last two simulated states. Always `1.0` in
    /// variable-timestep mode.
    fn render(&mut self, alpha: f32) -> Result<(), AppError>;

    /// Called once after the last frame, also when the loop ends with an error
    fn on_stop(&mut self) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Scene management failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// World operation failed
    #[error("World error: {0}")]
    Ecs(#[from] EcsError),

    /// Animation lookup failed
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// Asset loading failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
