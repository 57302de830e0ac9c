//! Named actions bound to keys and mouse buttons
//!
//! Gameplay code asks "was `jump` pressed" instead of hard-coding keys. A
//! mapping is plain serde data, so bindings can be loaded from the same
//! `.toml`/`.ron` files as the rest of the configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{InputManager, KeyCode, MouseButton};
use crate::config::Config;

/// Everything bound to one action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    /// Keys that trigger the action
    #[serde(default)]
    pub keys: Vec<KeyCode>,
    /// Mouse buttons that trigger the action
    #[serde(default)]
    pub mouse_buttons: Vec<MouseButton>,
}

/// Action name → bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMapping {
    #[serde(default)]
    actions: BTreeMap<String, ActionBinding>,
}

impl InputMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an action's bindings wholesale
    pub fn map_action(&mut self, action: impl Into<String>, keys: &[KeyCode], buttons: &[MouseButton]) {
        self.actions.insert(
            action.into(),
            ActionBinding {
                keys: keys.to_vec(),
                mouse_buttons: buttons.to_vec(),
            },
        );
    }

    /// Add one key to an action, creating the action if needed
    pub fn map_key(&mut self, action: impl Into<String>, key: KeyCode) {
        let binding = self.actions.entry(action.into()).or_default();
        if !binding.keys.contains(&key) {
            binding.keys.push(key);
        }
    }

    /// Add one mouse button to an action, creating the action if needed
    pub fn map_mouse_button(&mut self, action: impl Into<String>, button: MouseButton) {
        let binding = self.actions.entry(action.into()).or_default();
        if !binding.mouse_buttons.contains(&button) {
            binding.mouse_buttons.push(button);
        }
    }

    /// Remove an action and all of its bindings
    pub fn clear_action(&mut self, action: &str) -> Option<ActionBinding> {
        self.actions.remove(action)
    }

    /// Bindings for an action
    pub fn binding(&self, action: &str) -> Option<&ActionBinding> {
        self.actions.get(action)
    }

    /// Registered action names, sorted
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    fn any_binding(
        &self,
        action: &str,
        key_test: impl Fn(KeyCode) -> bool,
        button_test: impl Fn(MouseButton) -> bool,
    ) -> bool {
        self.actions.get(action).is_some_and(|binding| {
            binding.keys.iter().any(|k| key_test(*k))
                || binding.mouse_buttons.iter().any(|b| button_test(*b))
        })
    }

    /// Any binding went down this tick
    pub fn is_action_pressed(&self, action: &str, input: &InputManager) -> bool {
        self.any_binding(
            action,
            |k| input.is_key_pressed(k),
            |b| input.is_mouse_button_pressed(b),
        )
    }

    /// Any binding is held
    pub fn is_action_held(&self, action: &str, input: &InputManager) -> bool {
        self.any_binding(
            action,
            |k| input.is_key_held(k),
            |b| input.is_mouse_button_held(b),
        )
    }

    /// Any binding went up this tick
    pub fn is_action_released(&self, action: &str, input: &InputManager) -> bool {
        self.any_binding(
            action,
            |k| input.is_key_released(k),
            |b| input.is_mouse_button_released(b),
        )
    }
}

impl Config for InputMapping {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::input::test_support::ScriptedInput;

    fn jump_mapping() -> InputMapping {
        let mut mapping = InputMapping::new();
        mapping.map_key("jump", KeyCode::Space);
        mapping.map_key("jump", KeyCode::W);
        mapping.map_mouse_button("fire", MouseButton::Left);
        mapping
    }

    #[test]
    fn test_any_key_triggers_action() {
        let mapping = jump_mapping();
        let mut input = InputManager::new();
        let mut source = ScriptedInput::default();
        source.keys.insert(KeyCode::W);

        input.update(&source);
        assert!(mapping.is_action_pressed("jump", &input));
        assert!(!mapping.is_action_pressed("fire", &input));

        input.update(&source);
        assert!(mapping.is_action_held("jump", &input));

        source.keys.clear();
        input.update(&source);
        assert!(mapping.is_action_released("jump", &input));
    }

    #[test]
    fn test_unknown_and_cleared_actions_never_fire() {
        let mut mapping = jump_mapping();
        let mut input = InputManager::new();
        let mut source = ScriptedInput::default();
        source.keys.insert(KeyCode::Space);
        input.update(&source);

        assert!(!mapping.is_action_pressed("dash", &input));
        assert!(mapping.clear_action("jump").is_some());
        assert!(!mapping.is_action_pressed("jump", &input));
    }

    #[test]
    fn test_duplicate_bindings_ignored() {
        let mut mapping = InputMapping::new();
        mapping.map_key("left", KeyCode::A);
        mapping.map_key("left", KeyCode::A);
        assert_eq!(mapping.binding("left").map(|b| b.keys.len()), Some(1));
    }

    #[test]
    fn test_mapping_from_toml() {
        let text = r#"
            [actions.jump]
            keys = ["Space", "Up"]

            [actions.fire]
            mouse_buttons = ["Left"]
        "#;
        let mapping = InputMapping::from_str_with(text, ConfigFormat::Toml).unwrap();
        assert_eq!(mapping.actions().collect::<Vec<_>>(), vec!["fire", "jump"]);
        assert_eq!(
            mapping.binding("jump").map(|b| b.keys.clone()),
            Some(vec![KeyCode::Space, KeyCode::Up])
        );
    }
}
