//! Scenes and the scene stack
//!
//! A [`Scene`] is the boundary between the engine and game content. The
//! [`SceneManager`] owns registered scenes by name and applies requested
//! transitions at the start of the next update, never mid-frame.

pub mod base;
pub mod scene_manager;
pub mod world_scene;

pub use base::{Scene, SceneState};
pub use scene_manager::SceneManager;
pub use world_scene::WorldScene;

use crate::ecs::EcsError;
use crate::render::RenderError;
use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene registry and lifecycle errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// No scene registered under this name
    #[error("Scene '{0}' not found")]
    NotFound(String),

    /// A scene with this name is already registered
    #[error("Scene '{0}' already registered")]
    AlreadyRegistered(String),

    /// `pop_scene` with nothing pushed
    #[error("No scenes in stack to pop")]
    EmptyStack,

    /// The scene is current, pending or stacked
    #[error("Scene '{0}' is in use")]
    InUse(String),

    /// A lifecycle hook failed during a transition or cleanup
    #[error("Failed to {stage} scene '{scene}': {source}")]
    Lifecycle {
        /// Scene whose hook failed
        scene: String,
        /// Hook name
        stage: &'static str,
        /// Underlying failure
        source: Box<SceneError>,
    },

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// World operation failed
    #[error("World error: {0}")]
    Ecs(#[from] EcsError),

    /// Scene-specific failure
    #[error("{0}")]
    Custom(String),
}

impl SceneError {
    pub(crate) fn lifecycle(scene: &str, stage: &'static str, source: Self) -> Self {
        Self::Lifecycle {
            scene: scene.to_string(),
            stage,
            source: Box::new(source),
        }
    }
}
