//! Scene registry with switch/push/pop navigation

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use super::{Scene, SceneError, SceneResult};
use crate::input::{InputManager, InputMapping};
use crate::render::SpriteRenderer;

new_key_type! {
    struct SceneKey;
}

/// Owns scenes by name and drives the current one
///
/// `switch_to_scene`, `push_scene` and `pop_scene` only record the request.
/// The next [`update`](Self::update) performs it: the outgoing scene exits,
/// the incoming one is loaded if needed, entered and resumed, and only then
/// updated.
pub struct SceneManager {
    scenes: SlotMap<SceneKey, Box<dyn Scene>>,
    names: HashMap<String, SceneKey>,
    current: Option<SceneKey>,
    next: Option<SceneKey>,
    stack: Vec<SceneKey>,
    transitioning: bool,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    /// Empty manager
    pub fn new() -> Self {
        Self {
            scenes: SlotMap::with_key(),
            names: HashMap::new(),
            current: None,
            next: None,
            stack: Vec::new(),
            transitioning: false,
        }
    }

    fn key(&self, name: &str) -> SceneResult<SceneKey> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Add a scene; names must be unique
    pub fn register_scene(&mut self, scene: impl Scene + 'static) -> SceneResult<()> {
        let name = scene.name().to_string();
        if self.names.contains_key(&name) {
            return Err(SceneError::AlreadyRegistered(name));
        }
        let key = self.scenes.insert(Box::new(scene));
        log::debug!("Registered scene '{}'", name);
        self.names.insert(name, key);
        Ok(())
    }

    /// Remove a scene that is not current, pending or stacked; unloads it first
    pub fn unregister_scene(&mut self, name: &str) -> SceneResult<Box<dyn Scene>> {
        let key = self.key(name)?;
        if self.current == Some(key) || self.next == Some(key) || self.stack.contains(&key) {
            return Err(SceneError::InUse(name.to_string()));
        }

        if let Some(scene) = self.scenes.get_mut(key) {
            if scene.is_loaded() {
                scene.unload().map_err(|e| SceneError::lifecycle(name, "unload", e))?;
                scene.state_mut().set_loaded(false);
            }
        }

        self.names.remove(name);
        self.scenes
            .remove(key)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Replace the current scene on the next update
    pub fn switch_to_scene(&mut self, name: &str) -> SceneResult<()> {
        let key = self.key(name)?;
        self.next = Some(key);
        self.transitioning = true;
        Ok(())
    }

    /// Pause the current scene, remember it, and switch to `name` on the next update
    pub fn push_scene(&mut self, name: &str) -> SceneResult<()> {
        let key = self.key(name)?;
        if let Some(current) = self.current {
            self.stack.push(current);
            if let Some(scene) = self.scenes.get_mut(current) {
                scene.pause();
            }
        }
        self.next = Some(key);
        self.transitioning = true;
        Ok(())
    }

    /// Return to the most recently pushed scene on the next update
    pub fn pop_scene(&mut self) -> SceneResult<()> {
        let key = self.stack.pop().ok_or(SceneError::EmptyStack)?;
        self.next = Some(key);
        self.transitioning = true;
        Ok(())
    }

    /// Apply a pending transition, then update the current scene
    pub fn update(&mut self, dt: f32) -> SceneResult<()> {
        if self.transitioning {
            self.transitioning = false;
            self.perform_transition()?;
        }

        match self.current.and_then(|key| self.scenes.get_mut(key)) {
            Some(scene) => scene.update(dt),
            None => Ok(()),
        }
    }

    fn perform_transition(&mut self) -> SceneResult<()> {
        let Some(next) = self.next.take() else {
            return Ok(());
        };
        let next_name = self.scene_name(next);
        let previous = self.current;
        let previous_name = previous.map(|key| self.scene_name(key));

        if let Some(scene) = previous.and_then(|key| self.scenes.get_mut(key)) {
            scene
                .exit(Some(&next_name))
                .map_err(|e| SceneError::lifecycle(scene.name(), "exit", e))?;
        }

        self.current = Some(next);
        let scene = self
            .scenes
            .get_mut(next)
            .ok_or_else(|| SceneError::NotFound(next_name.clone()))?;

        if !scene.is_loaded() {
            scene.load().map_err(|e| SceneError::lifecycle(&next_name, "load", e))?;
            scene.state_mut().set_loaded(true);
        }
        scene
            .enter(previous_name.as_deref())
            .map_err(|e| SceneError::lifecycle(&next_name, "enter", e))?;
        scene.resume();

        log::info!(
            "Scene transition '{}' -> '{}'",
            previous_name.as_deref().unwrap_or("<none>"),
            next_name
        );
        Ok(())
    }

    fn scene_name(&self, key: SceneKey) -> String {
        self.scenes.get(key).map(|s| s.name().to_string()).unwrap_or_default()
    }

    /// Render the current scene
    pub fn render(&mut self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> SceneResult<()> {
        match self.current.and_then(|key| self.scenes.get_mut(key)) {
            Some(scene) => scene.render(alpha, renderer),
            None => Ok(()),
        }
    }

    /// Forward input to the current scene
    pub fn handle_input(&mut self, input: &InputManager, mapping: &InputMapping) -> SceneResult<()> {
        match self.current.and_then(|key| self.scenes.get_mut(key)) {
            Some(scene) => scene.handle_input(input, mapping),
            None => Ok(()),
        }
    }

    /// Name of the current scene
    pub fn current_scene_name(&self) -> Option<&str> {
        self.current.and_then(|key| self.scenes.get(key)).map(|s| s.name())
    }

    /// Look up a registered scene
    pub fn scene(&self, name: &str) -> Option<&dyn Scene> {
        let key = self.names.get(name)?;
        self.scenes.get(*key).map(|s| &**s)
    }

    /// Look up a registered scene mutably
    pub fn scene_mut(&mut self, name: &str) -> Option<&mut (dyn Scene + 'static)> {
        let key = self.names.get(name)?;
        self.scenes.get_mut(*key).map(|s| &mut **s)
    }

    /// Number of registered scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Number of pushed scenes waiting to be popped
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// A transition has been requested but not yet applied
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Exit the current scene, unload every loaded scene and forget them all
    pub fn cleanup(&mut self) -> SceneResult<()> {
        if let Some(scene) = self.current.and_then(|key| self.scenes.get_mut(key)) {
            if let Err(err) = scene.exit(None) {
                log::warn!("Scene '{}' failed to exit during cleanup: {}", scene.name(), err);
            }
        }

        let mut result = Ok(());
        for scene in self.scenes.values_mut() {
            if scene.is_loaded() {
                match scene.unload() {
                    Ok(()) => scene.state_mut().set_loaded(false),
                    Err(err) if result.is_ok() => {
                        result = Err(SceneError::lifecycle(scene.name(), "unload", err));
                    }
                    Err(err) => log::warn!("Scene '{}' failed to unload: {}", scene.name(), err),
                }
            }
        }

        self.scenes.clear();
        self.names.clear();
        self.current = None;
        self.next = None;
        self.stack.clear();
        self.transitioning = false;
        result
    }
}
