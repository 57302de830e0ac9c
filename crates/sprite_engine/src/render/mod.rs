//! Sprite rendering
//!
//! The engine side of 2D rendering: texture handles, sprites, the batching
//! renderer and the camera. Actual GPU work is delegated to a
//! [`RenderBackend`] supplied by the host.

pub mod backend;
pub mod batch_renderer;
pub mod camera;
pub mod shader;
pub mod sprite;
pub mod texture;

pub use backend::RenderBackend;
pub use batch_renderer::{BatchStats, SpriteBatch, SpriteRenderer, SpriteVertex};
pub use camera::{Camera2D, CameraBounds};
pub use shader::{ShaderHandle, ShaderProgram, Uniform};
pub use sprite::Sprite;
pub use texture::{Texture, TextureId, TextureRegion};

use thiserror::Error;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the render path
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend rejected an operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// Shader compilation or linking failed
    #[error("Shader error: {0}")]
    Shader(String),

    /// Texture creation failed
    #[error("Texture error: {0}")]
    Texture(String),
}
