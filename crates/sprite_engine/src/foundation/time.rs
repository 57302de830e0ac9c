//! Time management utilities
//!
//! [`TimeManager`] is the engine clock: it samples a [`ClockSource`] once per
//! frame, derives raw and scaled deltas, tracks pause spans and keeps rolling
//! frame statistics. [`Timer`] and [`Stopwatch`] are small helpers driven by
//! whatever delta the caller feeds them.

use std::time::Duration;

use crate::core::config::TimeConfig;
use crate::platform::{ClockSource, SystemClock};

/// Upper bound on a single frame delta, in seconds
///
/// A debugger break or a window drag can stall the loop for seconds; feeding
/// that straight into the simulation makes everything explode.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Default size of the delta-time ring buffer
pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Frame clock with pause, time scaling and frame-rate limiting
pub struct TimeManager<C: ClockSource = SystemClock> {
    clock: C,

    start_time: f64,
    current_time: f64,
    last_frame_time: f64,

    delta_time: f32,
    unscaled_delta_time: f32,
    max_frame_delta: f32,
    total_time: f64,
    frame_count: u64,

    paused: bool,
    pause_start_time: f64,
    total_pause_time: f64,
    time_scale: f32,

    target_fps: f32,
    frame_time_target: f64,
    last_sleep_time: f64,

    fps: f32,
    fps_frame_count: u32,
    fps_update_time: f64,

    delta_history: Vec<f32>,
    history_index: usize,
    samples: usize,
    min_delta: f32,
    max_delta: f32,
    avg_delta: f32,
}

impl TimeManager<SystemClock> {
    /// Create a time manager on the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for TimeManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> TimeManager<C> {
    /// Create a time manager sampling the given clock
    pub fn with_clock(clock: C) -> Self {
        Self::with_history(clock, DEFAULT_HISTORY_SIZE)
    }

    /// Create a time manager with a custom statistics window
    pub fn with_history(clock: C, history_size: usize) -> Self {
        let now = clock.now();
        Self {
            clock,
            start_time: now,
            current_time: now,
            last_frame_time: now,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            max_frame_delta: MAX_FRAME_DELTA,
            total_time: 0.0,
            frame_count: 0,
            paused: false,
            pause_start_time: 0.0,
            total_pause_time: 0.0,
            time_scale: 1.0,
            target_fps: 0.0,
            frame_time_target: 0.0,
            last_sleep_time: now,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            delta_history: vec![0.0; history_size.max(1)],
            history_index: 0,
            samples: 0,
            min_delta: f32::MAX,
            max_delta: 0.0,
            avg_delta: 0.0,
        }
    }

    /// Create a time manager with the statistics window from `config`
    pub fn from_config(clock: C, config: &TimeConfig) -> Self {
        Self::with_history(clock, config.history_size)
    }

    /// Number of deltas kept for min/max/average
    pub fn history_size(&self) -> usize {
        self.delta_history.len()
    }

    /// Override the per-frame delta clamp (seconds, must be positive)
    pub fn set_max_frame_delta(&mut self, max_delta: f32) {
        if max_delta > 0.0 {
            self.max_frame_delta = max_delta;
        }
    }

    /// Sample the clock and advance one frame
    pub fn update(&mut self) {
        self.current_time = self.clock.now();
        let raw = (self.current_time - self.last_frame_time).max(0.0) as f32;
        self.last_frame_time = self.current_time;

        let clamped = raw.min(self.max_frame_delta);
        self.unscaled_delta_time = clamped;
        self.record_delta(clamped);

        self.delta_time = if self.paused { 0.0 } else { clamped * self.time_scale };
        if !self.paused {
            self.total_time += f64::from(self.delta_time);
        }
        self.frame_count += 1;

        self.fps_frame_count += 1;
        let window = self.current_time - self.fps_update_time;
        if window >= 1.0 {
            self.fps = (f64::from(self.fps_frame_count) / window) as f32;
            self.fps_frame_count = 0;
            self.fps_update_time = self.current_time;
        }
    }

    /// Restart delta measurement from now, so time spent before a loop
    /// starts is not reported as the first frame's delta
    pub fn resync(&mut self) {
        let now = self.clock.now();
        self.current_time = now;
        self.last_frame_time = now;
        self.last_sleep_time = now;
    }

    fn record_delta(&mut self, delta: f32) {
        self.delta_history[self.history_index] = delta;
        self.history_index = (self.history_index + 1) % self.delta_history.len();
        self.samples = (self.samples + 1).min(self.delta_history.len());

        self.min_delta = self.min_delta.min(delta);
        self.max_delta = self.max_delta.max(delta);

        let (sum, count) = self
            .delta_history
            .iter()
            .filter(|d| **d > 0.0)
            .fold((0.0_f32, 0_u32), |(sum, count), d| (sum + d, count + 1));
        self.avg_delta = if count > 0 { sum / count as f32 } else { 0.0 };
    }

    /// Stop scaled time from advancing
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.pause_start_time = self.clock.now();
            log::debug!("Time paused at {:.3}s", self.pause_start_time);
        }
    }

    /// Resume scaled time, recording how long the pause lasted
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.total_pause_time += self.clock.now() - self.pause_start_time;
            log::debug!("Time resumed, total paused {:.3}s", self.total_pause_time);
        }
    }

    /// Flip between paused and running
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Whether scaled time is currently frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set the time scale; negative values are clamped to zero
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Cap the frame rate; `fps <= 0` disables the cap
    pub fn set_target_fps(&mut self, fps: f32) {
        self.target_fps = fps;
        self.frame_time_target = if fps > 0.0 { 1.0 / f64::from(fps) } else { 0.0 };
    }

    /// Configured frame-rate cap (0 when uncapped)
    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    /// Sleep so the time since the last sample matches the target frame time
    pub fn sleep_for_frame_limit(&mut self) {
        if self.target_fps <= 0.0 {
            return;
        }

        let elapsed = self.clock.now() - self.last_frame_time;
        if elapsed < self.frame_time_target {
            self.clock
                .sleep(Duration::from_secs_f64(self.frame_time_target - elapsed));
        }
        self.last_sleep_time = self.clock.now();
    }

    /// Timestamp taken right after the last frame-limit sleep
    pub fn last_sleep_time(&self) -> f64 {
        self.last_sleep_time
    }

    /// Scaled delta for this frame (0 while paused)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Clamped delta before pause and scaling are applied
    pub fn unscaled_delta_time(&self) -> f32 {
        self.unscaled_delta_time
    }

    /// Accumulated scaled time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Clock reading at the last update
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Number of updates so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed once per elapsed second
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Wall time since construction, excluding paused spans
    pub fn time_since_start(&self) -> f64 {
        let ongoing_pause = if self.paused {
            self.current_time - self.pause_start_time
        } else {
            0.0
        };
        (self.current_time - self.start_time - self.total_pause_time - ongoing_pause.max(0.0))
            .max(0.0)
    }

    /// Smallest delta recorded since the last stats reset
    pub fn min_delta_time(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            self.min_delta
        }
    }

    /// Largest delta recorded since the last stats reset
    pub fn max_delta_time(&self) -> f32 {
        self.max_delta
    }

    /// Mean of the non-zero deltas in the ring buffer
    pub fn average_delta_time(&self) -> f32 {
        self.avg_delta
    }

    /// Clear min/max/average tracking
    pub fn reset_performance_stats(&mut self) {
        self.delta_history.iter_mut().for_each(|d| *d = 0.0);
        self.history_index = 0;
        self.samples = 0;
        self.min_delta = f32::MAX;
        self.max_delta = 0.0;
        self.avg_delta = 0.0;
    }

    /// Access the underlying clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Countdown timer with an optional completion callback
pub struct Timer {
    duration: f32,
    remaining: f32,
    running: bool,
    repeating: bool,
    callback: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("duration", &self.duration)
            .field("remaining", &self.remaining)
            .field("running", &self.running)
            .field("repeating", &self.repeating)
            .finish_non_exhaustive()
    }
}

impl Timer {
    /// Create a stopped one-shot timer
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
            running: false,
            repeating: false,
            callback: None,
        }
    }

    /// Create a stopped timer that re-arms itself after firing
    pub fn new_repeating(duration: f32) -> Self {
        Self {
            repeating: true,
            ..Self::new(duration)
        }
    }

    /// Attach the completion callback (builder style)
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Start counting down from the current remaining time
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pause the countdown
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and refill to the full duration
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.duration;
    }

    /// Refill and start again
    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    /// Advance by `dt`; returns true if the timer fired during this call
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }

        self.remaining -= dt;
        if self.remaining > 0.0 {
            return false;
        }

        if let Some(callback) = self.callback.as_mut() {
            callback();
        }

        if self.repeating {
            self.remaining = self.duration;
        } else {
            self.running = false;
            self.remaining = 0.0;
        }
        true
    }

    /// Whether the countdown is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stopped with nothing left on the clock
    pub fn is_complete(&self) -> bool {
        !self.running && self.remaining <= 0.0
    }

    /// Time left before the timer fires
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Full countdown length
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Completed fraction in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.remaining / self.duration
        }
    }

    /// Change the duration, clamping the remaining time into it
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.remaining = self.remaining.min(self.duration);
    }

    /// Whether the timer re-arms after firing
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }
}

/// Delta-driven stopwatch
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    elapsed: f32,
    running: bool,
}

impl Stopwatch {
    /// Create a stopped stopwatch at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            elapsed: 0.0,
            running: true,
        }
    }

    /// Start accumulating time
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accumulating time, keeping the elapsed value
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and zero
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Zero and start
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Add `dt` if running
    pub fn update(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Accumulated time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the stopwatch is accumulating
    pub fn is_running(&self) -> bool {
        self.running
    }
}
