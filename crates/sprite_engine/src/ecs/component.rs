//! Component set and lifecycle bookkeeping
//!
//! The set of component kinds is closed. Each entity holds at most one
//! component per kind in a fixed slot; only scripts carry open-ended
//! behaviour, through the [`Script`](super::components::Script) trait.

use super::components::{AnimationComponent, ScriptComponent, SpriteComponent, Transform};
use super::EntityId;
use crate::render::{RenderResult, SpriteRenderer};

/// Discriminant of a [`Component`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Placement; always present
    Transform,
    /// Drawable sprite
    Sprite,
    /// Animation state machine driving the sprite
    Animation,
    /// Per-entity behaviour hook
    Script,
}

/// Any component that can be attached to an entity
#[derive(Debug)]
pub enum Component {
    /// See [`Transform`]
    Transform(Transform),
    /// See [`SpriteComponent`]
    Sprite(SpriteComponent),
    /// See [`AnimationComponent`]
    Animation(AnimationComponent),
    /// See [`ScriptComponent`]
    Script(ScriptComponent),
}

impl Component {
    /// Which slot this component occupies
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::Sprite(_) => ComponentKind::Sprite,
            Self::Animation(_) => ComponentKind::Animation,
            Self::Script(_) => ComponentKind::Script,
        }
    }
}

impl From<Transform> for Component {
    fn from(value: Transform) -> Self {
        Self::Transform(value)
    }
}

impl From<SpriteComponent> for Component {
    fn from(value: SpriteComponent) -> Self {
        Self::Sprite(value)
    }
}

impl From<AnimationComponent> for Component {
    fn from(value: AnimationComponent) -> Self {
        Self::Animation(value)
    }
}

impl From<ScriptComponent> for Component {
    fn from(value: ScriptComponent) -> Self {
        Self::Script(value)
    }
}

/// Active/initialized flags and the owning entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentState {
    active: bool,
    initialized: bool,
    owner: Option<EntityId>,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            active: true,
            initialized: false,
            owner: None,
        }
    }
}

impl ComponentState {
    /// Is the component updated and rendered
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable the component
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Has the one-time initialize hook run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Entity the component is attached to
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Bind to `owner`; returns true when initialization should run
    pub(crate) fn attach(&mut self, owner: EntityId) -> bool {
        self.owner = Some(owner);
        !std::mem::replace(&mut self.initialized, true)
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
        self.initialized = false;
    }
}

/// Shared access to a component's [`ComponentState`]
pub trait Lifecycle {
    /// Lifecycle flags
    fn state(&self) -> &ComponentState;

    /// Mutable lifecycle flags
    fn state_mut(&mut self) -> &mut ComponentState;

    /// Is the component updated and rendered
    fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Enable or disable the component
    fn set_active(&mut self, active: bool) {
        self.state_mut().set_active(active);
    }

    /// Entity the component is attached to
    fn owner(&self) -> Option<EntityId> {
        self.state().owner()
    }
}

/// Components that draw something
pub trait Renderable {
    /// Submit draw calls; `alpha` is the fixed-step interpolation factor
    fn render(&self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> RenderResult<()>;

    /// Sort key for world rendering, lower first
    fn layer(&self) -> i32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_runs_once() {
        let mut state = ComponentState::default();
        assert!(state.attach(EntityId(1)));
        assert!(!state.attach(EntityId(1)));
        assert_eq!(state.owner(), Some(EntityId(1)));

        state.detach();
        assert_eq!(state.owner(), None);
        assert!(state.attach(EntityId(2)));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Component::from(Transform::default()).kind(), ComponentKind::Transform);
    }
}
