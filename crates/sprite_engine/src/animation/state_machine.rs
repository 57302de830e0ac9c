//! Animation state machine
//!
//! States wrap clips. Transitions fire on named one-shot triggers, optionally
//! gated by a minimum time in the source state and a condition over the
//! machine's parameter bag.
//!
//! When several triggers are pending in the same tick they are tried in the
//! order they were set, and at most one transition happens per update.
//! Triggers that did not cause a transition stay pending.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::clip::{AnimationClip, Frame};
use super::{AnimationError, AnimationResult};

/// A value stored in the parameter bag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Boolean parameter
    Bool(bool),
    /// Float parameter
    Float(f32),
    /// Integer parameter
    Int(i32),
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

/// Named values that transition conditions read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: HashMap<String, ParameterValue>,
}

impl Parameters {
    /// Set or overwrite a parameter
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw lookup
    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).copied()
    }

    /// Boolean parameter, or `default` when missing or of another type
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(ParameterValue::Bool(value)) => value,
            _ => default,
        }
    }

    /// Float parameter, or `default` when missing or of another type
    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        match self.get(name) {
            Some(ParameterValue::Float(value)) => value,
            _ => default,
        }
    }

    /// Integer parameter, or `default` when missing or of another type
    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        match self.get(name) {
            Some(ParameterValue::Int(value)) => value,
            _ => default,
        }
    }

    /// Remove a parameter
    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        self.values.remove(name)
    }
}

/// Predicate over the parameter bag
pub type TransitionCondition = Box<dyn Fn(&Parameters) -> bool>;

/// Edge from one state to another, fired by a trigger
pub struct AnimationTransition {
    from: String,
    to: String,
    trigger: String,
    condition: Option<TransitionCondition>,
    exit_time: Option<f32>,
}

impl fmt::Debug for AnimationTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTransition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("trigger", &self.trigger)
            .field("has_condition", &self.condition.is_some())
            .field("exit_time", &self.exit_time)
            .finish()
    }
}

impl AnimationTransition {
    /// Unconditional transition to `to` when `trigger` is set
    pub fn new(trigger: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: String::new(),
            to: to.into(),
            trigger: trigger.into(),
            condition: None,
            exit_time: None,
        }
    }

    /// Only fire when `condition` holds
    pub fn with_condition(mut self, condition: impl Fn(&Parameters) -> bool + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Only fire after `exit_time` seconds in the source state
    pub fn with_exit_time(mut self, exit_time: f32) -> Self {
        self.exit_time = Some(exit_time);
        self
    }

    /// Source state name (set when added to a state)
    pub fn source(&self) -> &str {
        &self.from
    }

    /// Target state name
    pub fn target(&self) -> &str {
        &self.to
    }

    /// Trigger name
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Exit-time gate, if any
    pub fn exit_time(&self) -> Option<f32> {
        self.exit_time
    }

    /// Gate check: exit time first, then the condition
    pub fn can_transition(&self, elapsed: f32, parameters: &Parameters) -> bool {
        if self.exit_time.is_some_and(|exit| elapsed < exit) {
            return false;
        }
        self.condition.as_ref().map_or(true, |condition| condition(parameters))
    }
}

/// A named state playing one clip
#[derive(Debug)]
pub struct AnimationState {
    name: String,
    clip: Arc<AnimationClip>,
    speed: f32,
    transitions: HashMap<String, AnimationTransition>,
}

impl AnimationState {
    /// State playing `clip` at normal speed
    pub fn new(name: impl Into<String>, clip: impl Into<Arc<AnimationClip>>) -> Self {
        Self {
            name: name.into(),
            clip: clip.into(),
            speed: 1.0,
            transitions: HashMap::new(),
        }
    }

    /// Builder pattern: set the playback speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Builder pattern: add a transition
    pub fn with_transition(mut self, transition: AnimationTransition) -> Self {
        self.add_transition(transition);
        self
    }

    /// Add a transition; replaces any existing one for the same trigger
    pub fn add_transition(&mut self, mut transition: AnimationTransition) {
        transition.from.clone_from(&self.name);
        if let Some(old) = self.transitions.insert(transition.trigger.clone(), transition) {
            log::debug!(
                "State '{}' replaced transition on trigger '{}' (was -> '{}')",
                self.name,
                old.trigger,
                old.to
            );
        }
    }

    /// Shorthand for a timed transition
    pub fn add_timed_transition(&mut self, trigger: impl Into<String>, to: impl Into<String>, exit_time: f32) {
        self.add_transition(AnimationTransition::new(trigger, to).with_exit_time(exit_time));
    }

    /// Transition bound to `trigger`, if any
    pub fn transition(&self, trigger: &str) -> Option<&AnimationTransition> {
        self.transitions.get(trigger)
    }

    /// State name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip played in this state
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Playback speed multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the playback speed
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

/// Drives which clip is playing and how far into it
#[derive(Debug)]
pub struct AnimationStateMachine {
    states: HashMap<String, AnimationState>,
    current: Option<String>,
    elapsed: f32,
    triggers: Vec<String>,
    parameters: Parameters,
    playing: bool,
}

impl Default for AnimationStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationStateMachine {
    /// Empty machine, playing
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            elapsed: 0.0,
            triggers: Vec::new(),
            parameters: Parameters::default(),
            playing: true,
        }
    }

    /// Register a state; the first one added becomes current
    pub fn add_state(&mut self, state: AnimationState) {
        if self.current.is_none() {
            self.current = Some(state.name.clone());
        }
        self.states.insert(state.name.clone(), state);
    }

    /// Jump straight to a state, restarting its clip
    pub fn set_state(&mut self, name: &str) -> AnimationResult<()> {
        if !self.states.contains_key(name) {
            return Err(AnimationError::StateNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        self.elapsed = 0.0;
        Ok(())
    }

    /// Arm a one-shot trigger
    pub fn set_trigger(&mut self, trigger: impl Into<String>) {
        let trigger = trigger.into();
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    /// Disarm a trigger without firing it
    pub fn reset_trigger(&mut self, trigger: &str) {
        self.triggers.retain(|t| t != trigger);
    }

    /// Is the trigger armed
    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.triggers.iter().any(|t| t == trigger)
    }

    /// Set a parameter
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(name, value);
    }

    /// The parameter bag
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Boolean parameter with a default
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.parameters.get_bool(name, default)
    }

    /// Float parameter with a default
    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        self.parameters.get_float(name, default)
    }

    /// Integer parameter with a default
    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        self.parameters.get_int(name, default)
    }

    /// Advance time and take at most one triggered transition
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(state) = self.current.as_ref().and_then(|name| self.states.get(name)) else {
            return;
        };

        self.elapsed += dt * state.speed;

        let fired = self.triggers.iter().enumerate().find_map(|(index, trigger)| {
            let transition = state.transition(trigger)?;
            (transition.can_transition(self.elapsed, &self.parameters)
                && self.states.contains_key(&transition.to))
            .then(|| (index, transition.to.clone()))
        });

        if let Some((index, target)) = fired {
            let trigger = self.triggers.remove(index);
            log::trace!(
                "Animation transition '{}' -> '{}' on '{}'",
                self.current.as_deref().unwrap_or_default(),
                target,
                trigger
            );
            self.current = Some(target);
            self.elapsed = 0.0;
        }

        if let Some(clip) = self.current_clip() {
            if !clip.is_looping() && self.elapsed >= clip.total_duration() {
                self.elapsed = clip.total_duration();
            }
        }
    }

    /// Frame to display right now
    pub fn current_frame(&self) -> AnimationResult<&Frame> {
        let clip = self.current_clip().ok_or(AnimationError::NoCurrentState)?;
        clip.frame_at(self.elapsed)
    }

    /// Clip of the current state
    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current_state().map(|state| state.clip.as_ref())
    }

    /// The current state
    pub fn current_state(&self) -> Option<&AnimationState> {
        self.current.as_ref().and_then(|name| self.states.get(name))
    }

    /// Name of the current state
    pub fn current_state_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Look up a state
    pub fn state(&self, name: &str) -> Option<&AnimationState> {
        self.states.get(name)
    }

    /// Look up a state mutably (to add transitions after registration)
    pub fn state_mut(&mut self, name: &str) -> Option<&mut AnimationState> {
        self.states.get_mut(name)
    }

    /// Number of registered states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Seconds spent in the current state (scaled by its speed)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether `update` advances time
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Resume playback
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze playback in place
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Freeze playback and rewind the current state
    pub fn stop(&mut self) {
        self.playing = false;
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Texture, TextureId, TextureRegion};
    use approx::assert_relative_eq;

    fn clip(name: &str, frames: usize, looping: bool) -> AnimationClip {
        let region = TextureRegion::full(Texture::new(TextureId(1), 32, 32));
        let frames = (0..frames).map(|_| Frame::new(region, 0.25)).collect();
        AnimationClip::with_frames(name, frames, looping)
    }

    fn machine() -> AnimationStateMachine {
        let mut machine = AnimationStateMachine::new();
        machine.add_state(
            AnimationState::new("idle", clip("idle", 2, true))
                .with_transition(AnimationTransition::new("walk", "walk"))
                .with_transition(AnimationTransition::new("attack", "attack"))
                .with_transition(
                    AnimationTransition::new("jump", "jump").with_condition(|p| p.get_bool("grounded", false)),
                ),
        );
        machine.add_state(
            AnimationState::new("walk", clip("walk", 4, true))
                .with_speed(2.0)
                .with_transition(AnimationTransition::new("stop", "idle")),
        );
        machine.add_state(AnimationState::new("jump", clip("jump", 2, false)));
        let mut attack = AnimationState::new("attack", clip("attack", 3, false));
        attack.add_timed_transition("done", "idle", 0.5);
        machine.add_state(attack);
        machine
    }

    #[test]
    fn test_first_state_is_current() {
        let machine = machine();
        assert_eq!(machine.current_state_name(), Some("idle"));
        assert_eq!(machine.state_count(), 4);
    }

    #[test]
    fn test_trigger_transitions_and_is_consumed() {
        let mut machine = machine();
        machine.update(0.1);
        machine.set_trigger("walk");
        machine.update(0.1);
        assert_eq!(machine.current_state_name(), Some("walk"));
        assert_relative_eq!(machine.elapsed(), 0.0);
        assert!(!machine.has_trigger("walk"));

        machine.update(0.1);
        assert_relative_eq!(machine.elapsed(), 0.2);
    }

    #[test]
    fn test_one_transition_per_update_in_insertion_order() {
        let mut machine = machine();
        machine.set_trigger("attack");
        machine.set_trigger("walk");
        machine.update(0.0);
        assert_eq!(machine.current_state_name(), Some("attack"));
        // "walk" has no edge out of "attack" so it stays pending
        assert!(machine.has_trigger("walk"));
    }

    #[test]
    fn test_condition_blocks_until_parameter_set() {
        let mut machine = machine();
        machine.set_trigger("jump");
        machine.update(0.0);
        assert_eq!(machine.current_state_name(), Some("idle"));
        assert!(machine.has_trigger("jump"));

        machine.set_parameter("grounded", true);
        machine.update(0.0);
        assert_eq!(machine.current_state_name(), Some("jump"));
    }

    #[test]
    fn test_exit_time_gate() {
        let mut machine = machine();
        machine.set_state("attack").unwrap();
        machine.set_trigger("done");
        machine.update(0.3);
        assert_eq!(machine.current_state_name(), Some("attack"));
        machine.update(0.3);
        assert_eq!(machine.current_state_name(), Some("idle"));
    }

    #[test]
    fn test_one_shot_clip_holds_last_frame() {
        let mut machine = machine();
        machine.set_state("jump").unwrap();
        machine.update(5.0);
        assert_relative_eq!(machine.elapsed(), 0.5);
        let last = machine.current_clip().map(|c| c.frames()[1]);
        assert_eq!(machine.current_frame().ok().copied(), last);
    }

    #[test]
    fn test_unknown_state_is_an_error() {
        let mut machine = machine();
        assert_eq!(
            machine.set_state("swim"),
            Err(AnimationError::StateNotFound("swim".to_string()))
        );
        assert_eq!(machine.current_state_name(), Some("idle"));
    }

    #[test]
    fn test_pause_and_stop() {
        let mut machine = machine();
        machine.update(0.2);
        machine.pause();
        machine.update(1.0);
        assert_relative_eq!(machine.elapsed(), 0.2);
        machine.stop();
        assert_relative_eq!(machine.elapsed(), 0.0);
        assert!(!machine.is_playing());
        machine.play();
        machine.update(0.1);
        assert_relative_eq!(machine.elapsed(), 0.1);
    }

    #[test]
    fn test_empty_machine_has_no_frame() {
        let machine = AnimationStateMachine::new();
        assert_eq!(machine.current_frame().err(), Some(AnimationError::NoCurrentState));
    }

    #[test]
    fn test_parameter_defaults_on_type_mismatch() {
        let mut machine = AnimationStateMachine::new();
        machine.set_parameter("speed", 3.5_f32);
        machine.set_parameter("lives", 3);
        assert_relative_eq!(machine.get_float("speed", 0.0), 3.5);
        assert_eq!(machine.get_int("lives", 0), 3);
        assert!(machine.get_bool("speed", true));
        assert_eq!(machine.get_int("missing", -1), -1);
    }
}
