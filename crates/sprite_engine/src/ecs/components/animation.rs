//! Animation component
//!
//! Owns an [`AnimationStateMachine`] and pushes the current frame's region
//! onto the entity's sprite each update.

use super::sprite::SpriteComponent;
use crate::animation::{AnimationResult, AnimationState, AnimationStateMachine, Frame, ParameterValue};
use crate::ecs::component::{ComponentState, Lifecycle};
use crate::foundation::math::Vec2;
use crate::render::TextureRegion;

/// Drives a sprite from an animation state machine
#[derive(Debug, Default)]
pub struct AnimationComponent {
    state: ComponentState,
    machine: AnimationStateMachine,
    default_region: Option<TextureRegion>,
    offset: Vec2,
}

impl AnimationComponent {
    /// Component with no states
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing machine
    pub fn with_machine(machine: AnimationStateMachine) -> Self {
        Self {
            machine,
            ..Self::default()
        }
    }

    /// Builder pattern: register a state
    pub fn with_state(mut self, state: AnimationState) -> Self {
        self.machine.add_state(state);
        self
    }

    pub(crate) fn initialize(&mut self, sprite: Option<&SpriteComponent>) {
        self.capture_default(sprite);
    }

    /// Remember the sprite's region so it can be restored when no frame is
    /// available. The owning entity calls this again whenever its sprite is
    /// attached or removed, so attach order does not matter.
    pub(crate) fn capture_default(&mut self, sprite: Option<&SpriteComponent>) {
        self.default_region = sprite.and_then(SpriteComponent::region);
    }

    /// Advance the machine and apply the current frame to `sprite`
    pub fn update(&mut self, dt: f32, sprite: Option<&mut SpriteComponent>) {
        self.machine.update(dt);

        match self.machine.current_frame() {
            Ok(frame) => {
                self.offset = frame.offset;
                if let Some(sprite) = sprite {
                    sprite.set_region(frame.region);
                }
            }
            Err(err) => {
                log::trace!("No animation frame, using default region: {}", err);
                self.offset = Vec2::zeros();
                if let (Some(sprite), Some(region)) = (sprite, self.default_region) {
                    sprite.set_region(region);
                }
            }
        }
    }

    /// Stop playback when detached
    pub(crate) fn cleanup(&mut self) {
        self.machine.stop();
    }

    /// Offset of the current frame
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Region restored when the machine has nothing to show
    pub fn default_region(&self) -> Option<TextureRegion> {
        self.default_region
    }

    /// The underlying state machine
    pub fn machine(&self) -> &AnimationStateMachine {
        &self.machine
    }

    /// The underlying state machine, mutably
    pub fn machine_mut(&mut self) -> &mut AnimationStateMachine {
        &mut self.machine
    }

    /// Register a state
    pub fn add_state(&mut self, state: AnimationState) {
        self.machine.add_state(state);
    }

    /// Jump to a state
    pub fn set_state(&mut self, name: &str) -> AnimationResult<()> {
        self.machine.set_state(name)
    }

    /// Arm a trigger
    pub fn set_trigger(&mut self, trigger: impl Into<String>) {
        self.machine.set_trigger(trigger);
    }

    /// Set a parameter
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.machine.set_parameter(name, value);
    }

    /// Current frame
    pub fn current_frame(&self) -> AnimationResult<&Frame> {
        self.machine.current_frame()
    }

    /// Name of the playing state
    pub fn current_state_name(&self) -> Option<&str> {
        self.machine.current_state_name()
    }

    /// Resume playback
    pub fn play(&mut self) {
        self.machine.play();
    }

    /// Freeze playback
    pub fn pause(&mut self) {
        self.machine.pause();
    }

    /// Freeze and rewind
    pub fn stop(&mut self) {
        self.machine.stop();
    }
}

impl Lifecycle for AnimationComponent {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }
}
