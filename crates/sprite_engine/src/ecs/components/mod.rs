//! Built-in components

pub mod animation;
pub mod script;
pub mod sprite;
pub mod transform;

pub use animation::AnimationComponent;
pub use script::{MovementScript, Script, ScriptComponent, ScriptContext};
pub use sprite::SpriteComponent;
pub use transform::{Transform, WorldTransform};
