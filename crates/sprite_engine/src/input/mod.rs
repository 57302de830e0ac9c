//! Input management system
//!
//! [`InputManager`] samples an [`InputSource`] once per tick and derives
//! per-button edge states from the previous and current samples. Every edge
//! is also recorded as an [`InputEvent`] in a queue that the owner drains once
//! per tick.

pub mod mapping;

pub use mapping::{ActionBinding, InputMapping};

use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::events::EventQueue;
use crate::foundation::math::Vec2;
use crate::platform::InputSource;

/// Per-button state derived from two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    /// Not down, and was not down last tick either
    #[default]
    Up,
    /// Went down this tick
    Pressed,
    /// Down this tick and the previous one
    Held,
    /// Went up this tick
    Released,
}

impl ButtonState {
    /// Advance the state with a new sample
    pub fn next(self, down: bool) -> Self {
        match (self.is_down(), down) {
            (false, true) => Self::Pressed,
            (true, true) => Self::Held,
            (true, false) => Self::Released,
            (false, false) => Self::Up,
        }
    }

    /// Pressed or held
    pub fn is_down(self) -> bool {
        matches!(self, Self::Pressed | Self::Held)
    }
}

bitflags! {
    /// Modifier keys currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift key
        const SHIFT = 1 << 0;
        /// Either control key
        const CONTROL = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
    }
}

/// Something that happened to an input device this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key went down
    KeyPressed(KeyCode),
    /// Key went up
    KeyReleased(KeyCode),
    /// Mouse button went down
    MousePressed(MouseButton),
    /// Mouse button went up
    MouseReleased(MouseButton),
    /// Cursor moved
    MouseMoved {
        /// New cursor position
        position: Vec2,
        /// Movement since the previous tick
        delta: Vec2,
    },
    /// Scroll wheel moved
    MouseScrolled {
        /// Scroll offset since the previous tick
        delta: Vec2,
    },
}

/// Input manager
pub struct InputManager {
    keys: HashMap<KeyCode, ButtonState>,
    mouse_buttons: HashMap<MouseButton, ButtonState>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    has_cursor_sample: bool,
    events: EventQueue<InputEvent>,
}

impl InputManager {
    /// Maximum number of undrained events kept around
    pub const EVENT_BACKLOG: usize = 256;

    /// Create a new input manager with every button up
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            mouse_buttons: HashMap::new(),
            mouse_position: Vec2::zeros(),
            mouse_delta: Vec2::zeros(),
            scroll_delta: Vec2::zeros(),
            has_cursor_sample: false,
            events: EventQueue::bounded(Self::EVENT_BACKLOG),
        }
    }

    /// Sample the source and recompute every edge state
    pub fn update(&mut self, source: &dyn InputSource) {
        for key in KeyCode::ALL {
            let state = self.keys.entry(key).or_default();
            *state = state.next(source.is_key_down(key));
            match *state {
                ButtonState::Pressed => self.events.push(InputEvent::KeyPressed(key)),
                ButtonState::Released => self.events.push(InputEvent::KeyReleased(key)),
                _ => {}
            }
        }

        for button in MouseButton::ALL {
            let state = self.mouse_buttons.entry(button).or_default();
            *state = state.next(source.is_mouse_button_down(button));
            match *state {
                ButtonState::Pressed => self.events.push(InputEvent::MousePressed(button)),
                ButtonState::Released => self.events.push(InputEvent::MouseReleased(button)),
                _ => {}
            }
        }

        let (x, y) = source.cursor_position();
        let position = Vec2::new(x as f32, y as f32);
        self.mouse_delta = if self.has_cursor_sample {
            position - self.mouse_position
        } else {
            Vec2::zeros()
        };
        self.mouse_position = position;
        self.has_cursor_sample = true;
        if self.mouse_delta != Vec2::zeros() {
            self.events.push(InputEvent::MouseMoved {
                position,
                delta: self.mouse_delta,
            });
        }

        let (sx, sy) = source.scroll_offset();
        self.scroll_delta = Vec2::new(sx as f32, sy as f32);
        if self.scroll_delta != Vec2::zeros() {
            self.events.push(InputEvent::MouseScrolled {
                delta: self.scroll_delta,
            });
        }
    }

    /// Take the events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        self.events.drain().collect()
    }

    /// Events waiting to be drained
    pub fn pending_events(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// State of a key
    pub fn key_state(&self, key: KeyCode) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    /// Key went down this tick
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_state(key) == ButtonState::Pressed
    }

    /// Key has been down for at least two ticks
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.key_state(key) == ButtonState::Held
    }

    /// Key went up this tick
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.key_state(key) == ButtonState::Released
    }

    /// Key is down, whether it was just pressed or held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.key_state(key).is_down()
    }

    /// State of a mouse button
    pub fn mouse_button_state(&self, button: MouseButton) -> ButtonState {
        self.mouse_buttons.get(&button).copied().unwrap_or_default()
    }

    /// Mouse button went down this tick
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_button_state(button) == ButtonState::Pressed
    }

    /// Mouse button has been down for at least two ticks
    pub fn is_mouse_button_held(&self, button: MouseButton) -> bool {
        self.mouse_button_state(button) == ButtonState::Held
    }

    /// Mouse button went up this tick
    pub fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.mouse_button_state(button) == ButtonState::Released
    }

    /// Cursor position in window coordinates
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement since the previous tick
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll offset reported this tick
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    /// Modifier keys currently down
    pub fn modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        if self.is_key_down(KeyCode::LeftShift) || self.is_key_down(KeyCode::RightShift) {
            modifiers |= Modifiers::SHIFT;
        }
        if self.is_key_down(KeyCode::LeftControl) || self.is_key_down(KeyCode::RightControl) {
            modifiers |= Modifiers::CONTROL;
        }
        if self.is_key_down(KeyCode::LeftAlt) || self.is_key_down(KeyCode::RightAlt) {
            modifiers |= Modifiers::ALT;
        }
        modifiers
    }

    /// Either shift key is down
    pub fn is_shift_held(&self) -> bool {
        self.modifiers().contains(Modifiers::SHIFT)
    }

    /// Either control key is down
    pub fn is_ctrl_held(&self) -> bool {
        self.modifiers().contains(Modifiers::CONTROL)
    }

    /// Either alt key is down
    pub fn is_alt_held(&self) -> bool {
        self.modifiers().contains(Modifiers::ALT)
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard keys the input layer samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    // Letters
    /// Letter `A`
    A,
    /// Letter `B`
    B,
    /// Letter `C`
    C,
    /// Letter `D`
    D,
    /// Letter `E`
    E,
    /// Letter `F`
    F,
    /// Letter `G`
    G,
    /// Letter `H`
    H,
    /// Letter `I`
    I,
    /// Letter `J`
    J,
    /// Letter `K`
    K,
    /// Letter `L`
    L,
    /// Letter `M`
    M,
    /// Letter `N`
    N,
    /// Letter `O`
    O,
    /// Letter `P`
    P,
    /// Letter `Q`
    Q,
    /// Letter `R`
    R,
    /// Letter `S`
    S,
    /// Letter `T`
    T,
    /// Letter `U`
    U,
    /// Letter `V`
    V,
    /// Letter `W`
    W,
    /// Letter `X`
    X,
    /// Letter `Y`
    Y,
    /// Letter `Z`
    Z,

    // Digit row
    /// Digit `0` on the main row
    Num0,
    /// Digit `1` on the main row
    Num1,
    /// Digit `2` on the main row
    Num2,
    /// Digit `3` on the main row
    Num3,
    /// Digit `4` on the main row
    Num4,
    /// Digit `5` on the main row
    Num5,
    /// Digit `6` on the main row
    Num6,
    /// Digit `7` on the main row
    Num7,
    /// Digit `8` on the main row
    Num8,
    /// Digit `9` on the main row
    Num9,

    // Editing and navigation
    /// Space bar
    Space,
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,

    // Modifiers
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
    /// Left control
    LeftControl,
    /// Right control
    RightControl,
    /// Left alt
    LeftAlt,
    /// Right alt
    RightAlt,
}

impl KeyCode {
    /// Every key the manager samples each tick
    pub const ALL: [Self; 51] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G,
        Self::H, Self::I, Self::J, Self::K, Self::L, Self::M, Self::N,
        Self::O, Self::P, Self::Q, Self::R, Self::S, Self::T, Self::U,
        Self::V, Self::W, Self::X, Self::Y, Self::Z,
        Self::Num0, Self::Num1, Self::Num2, Self::Num3, Self::Num4,
        Self::Num5, Self::Num6, Self::Num7, Self::Num8, Self::Num9,
        Self::Space, Self::Enter, Self::Escape, Self::Tab, Self::Backspace,
        Self::Up, Self::Down, Self::Left, Self::Right,
        Self::LeftShift, Self::RightShift, Self::LeftControl, Self::RightControl,
        Self::LeftAlt, Self::RightAlt,
    ];
}

/// Mouse buttons the input layer samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    /// Every button the manager samples each tick
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Middle];
}
