//! Host platform abstraction
//!
//! The engine never talks to an OS window, a GPU context or a keyboard
//! directly. The host supplies these collaborators through the traits in
//! this module:
//!
//! - [`ClockSource`]: a monotonic timestamp plus a blocking sleep
//! - [`WindowSurface`]: the should-close signal and frame presentation
//! - [`InputSource`]: raw "is this button down right now" queries
//!
//! Headless implementations ([`SystemClock`], [`ManualClock`]) are provided
//! so the loop can run in tests and tools without a window.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::input::{KeyCode, MouseButton};

/// Monotonic clock consumed by the time manager and the game loop
pub trait ClockSource {
    /// Seconds elapsed since an arbitrary, fixed origin
    fn now(&self) -> f64;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the moment of construction
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock for deterministic runs
///
/// Clones share the same timeline, so a test can keep one handle to advance
/// time while the engine owns another. Sleeping advances the timeline by the
/// requested duration instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock starting at `t = 0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    /// Jump to an absolute time
    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration.as_secs_f64());
    }
}

/// Presentation surface the loop drives once per frame
pub trait WindowSurface {
    /// True once the host wants the loop to end (close button, etc.)
    fn should_close(&self) -> bool;

    /// Swap buffers and pump pending OS events
    fn present(&mut self);
}

/// Raw button queries the input manager samples each frame
///
/// Implementations only report the current level of each button. Edge
/// detection (pressed/released this frame) happens inside the engine.
pub trait InputSource {
    /// Is the key currently held down
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Is the mouse button currently held down
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    /// Cursor position in window coordinates
    fn cursor_position(&self) -> (f64, f64);

    /// Scroll wheel offset accumulated since the previous frame
    fn scroll_offset(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}
