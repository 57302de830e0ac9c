//! Script component: a per-entity behaviour hook

use std::fmt;

use super::transform::Transform;
use crate::ecs::component::{ComponentState, Lifecycle};
use crate::ecs::EntityId;
use crate::foundation::math::Vec2;

/// What a script may touch while it runs
pub struct ScriptContext<'a> {
    /// Entity running the script
    pub entity: EntityId,
    /// Entity display name
    pub name: &'a str,
    /// Entity's local transform
    pub transform: &'a mut Transform,
}

/// Behaviour attached to a single entity
///
/// `start` runs once when the script is attached, `update` every tick while
/// the entity and the component are active, `stop` when it is removed or the
/// entity is destroyed.
pub trait Script {
    /// Called once on attach
    fn start(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// Called every update
    fn update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32);

    /// Called once on detach or destroy
    fn stop(&mut self, _ctx: &mut ScriptContext<'_>) {}
}

/// Holds a boxed [`Script`]
pub struct ScriptComponent {
    state: ComponentState,
    script: Box<dyn Script>,
}

impl fmt::Debug for ScriptComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptComponent").field("state", &self.state).finish_non_exhaustive()
    }
}

impl ScriptComponent {
    /// Wrap a script
    pub fn new(script: impl Script + 'static) -> Self {
        Self {
            state: ComponentState::default(),
            script: Box::new(script),
        }
    }

    pub(crate) fn start(&mut self, ctx: &mut ScriptContext<'_>) {
        self.script.start(ctx);
    }

    pub(crate) fn update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        self.script.update(ctx, dt);
    }

    pub(crate) fn stop(&mut self, ctx: &mut ScriptContext<'_>) {
        self.script.stop(ctx);
    }
}

impl Lifecycle for ScriptComponent {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }
}

/// Moves the entity at a constant velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementScript {
    speed: f32,
    direction: Vec2,
}

impl MovementScript {
    /// Move along `direction` (normalized) at `speed` units per second
    pub fn new(speed: f32, direction: Vec2) -> Self {
        let mut script = Self {
            speed,
            direction: Vec2::zeros(),
        };
        script.set_direction(direction);
        script
    }

    /// Units per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the speed
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Unit direction, zero when standing still
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Change the direction; a zero vector stops movement
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros);
    }
}

impl Script for MovementScript {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let step = self.direction * self.speed * dt;
        ctx.transform.translate_2d(step.x, step.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_movement_normalizes_direction() {
        let mut script = MovementScript::new(10.0, Vec2::new(3.0, 4.0));
        assert_relative_eq!(script.direction(), Vec2::new(0.6, 0.8));

        let mut transform = Transform::default();
        let mut ctx = ScriptContext {
            entity: EntityId(1),
            name: "mover",
            transform: &mut transform,
        };
        script.update(&mut ctx, 0.5);
        assert_relative_eq!(transform.position.x, 3.0);
        assert_relative_eq!(transform.position.y, 4.0);
    }

    #[test]
    fn test_zero_direction_stands_still() {
        let script = MovementScript::new(5.0, Vec2::zeros());
        assert_eq!(script.direction(), Vec2::zeros());
    }
}
