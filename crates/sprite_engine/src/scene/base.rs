//! The scene contract

use super::SceneResult;
use crate::input::{InputManager, InputMapping};
use crate::render::SpriteRenderer;

/// Name and lifecycle flags every scene carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneState {
    name: String,
    loaded: bool,
    paused: bool,
}

impl SceneState {
    /// Unloaded, running state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded: false,
            paused: false,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Has `load` run (and `unload` not since)
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Is the scene paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Set the paused flag
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// Game content driven by the [`SceneManager`](super::SceneManager)
///
/// `load`, `unload`, `enter` and `exit` are hooks; the manager keeps the
/// loaded flag in [`SceneState`] itself. A scene that is paused still gets
/// `update` and `render` calls and decides what to skip.
pub trait Scene {
    /// Lifecycle flags
    fn state(&self) -> &SceneState;

    /// Mutable lifecycle flags
    fn state_mut(&mut self) -> &mut SceneState;

    /// Unique name within a manager
    fn name(&self) -> &str {
        self.state().name()
    }

    /// Acquire resources; runs once before the first `enter`
    fn load(&mut self) -> SceneResult<()> {
        Ok(())
    }

    /// Release resources
    fn unload(&mut self) -> SceneResult<()> {
        Ok(())
    }

    /// Becoming current; `previous` is the scene being left
    fn enter(&mut self, _previous: Option<&str>) -> SceneResult<()> {
        Ok(())
    }

    /// No longer current; `next` is the scene taking over
    fn exit(&mut self, _next: Option<&str>) -> SceneResult<()> {
        Ok(())
    }

    /// Advance the simulation
    fn update(&mut self, dt: f32) -> SceneResult<()>;

    /// Draw the scene
    fn render(&mut self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> SceneResult<()>;

    /// React to this tick's input
    fn handle_input(&mut self, _input: &InputManager, _mapping: &InputMapping) -> SceneResult<()> {
        Ok(())
    }

    /// Stop advancing
    fn pause(&mut self) {
        self.state_mut().set_paused(true);
    }

    /// Continue advancing
    fn resume(&mut self) {
        self.state_mut().set_paused(false);
    }

    /// Is the scene paused
    fn is_paused(&self) -> bool {
        self.state().is_paused()
    }

    /// Has the scene been loaded
    fn is_loaded(&self) -> bool {
        self.state().is_loaded()
    }
}
