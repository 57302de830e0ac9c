//! Entity/component world
//!
//! The [`World`] owns every [`Entity`] in one id-keyed arena. Hierarchy
//! links are plain [`EntityId`]s, so destroying or re-parenting never
//! involves shared ownership.

pub mod component;
pub mod components;
pub mod entity;
pub mod world;

pub use component::{Component, ComponentKind, ComponentState, Lifecycle, Renderable};
pub use components::{
    AnimationComponent, MovementScript, Script, ScriptComponent, ScriptContext, SpriteComponent, Transform,
    WorldTransform,
};
pub use entity::Entity;
pub use world::World;

use std::fmt;
use thiserror::Error;

/// Entity identifier, unique within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result type for world operations
pub type EcsResult<T> = Result<T, EcsError>;

/// World and component errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// No entity with this id
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Id already taken
    #[error("Entity {0} already exists")]
    DuplicateEntity(EntityId),

    /// Slot for this kind is already filled
    #[error("Entity {entity} already has a {kind:?} component")]
    ComponentExists {
        /// Target entity
        entity: EntityId,
        /// Component kind
        kind: ComponentKind,
    },

    /// Slot for this kind is empty
    #[error("Entity {entity} has no {kind:?} component")]
    ComponentMissing {
        /// Target entity
        entity: EntityId,
        /// Component kind
        kind: ComponentKind,
    },

    /// The transform can never be removed
    #[error("Entity {0} must keep its transform")]
    TransformRequired(EntityId),

    /// Re-parenting would create a loop
    #[error("Making {parent} the parent of {child} would create a cycle")]
    HierarchyCycle {
        /// Entity being re-parented
        child: EntityId,
        /// Requested parent
        parent: EntityId,
    },
}
