//! Game loop
//!
//! Drives an [`Application`] (or a pair of update/render closures) from a
//! [`TimeManager`], in either fixed or variable timestep mode.
//!
//! Fixed mode accumulates the clamped, unscaled frame delta and runs as many
//! constant-size updates as fit, then renders once with the leftover
//! fraction as the interpolation factor. Variable mode runs one update with
//! the clamped delta and renders with `alpha = 1.0`. Both modes present the
//! frame and sleep to the frame-rate cap at the end of each iteration.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::application::{AppError, Application};
use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::core::config::{EngineConfig, LoopConfig, TimestepMode};
use crate::foundation::time::TimeManager;
use crate::platform::{ClockSource, SystemClock, WindowSurface};

/// Errors that end or prevent a run
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fatal setup mistake, such as starting without callbacks
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An application callback failed
    #[error("Application error: {0}")]
    Application(#[from] AppError),

    /// Loading or validating configuration failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading failed during startup
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Leftover simulation time between fixed steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepAccumulator {
    step: f64,
    accumulated: f64,
}

impl FixedStepAccumulator {
    /// Accumulator for steps of `step` seconds
    pub fn new(step: f32) -> Self {
        Self {
            step: f64::from(step),
            accumulated: 0.0,
        }
    }

    /// Add a frame's delta
    pub fn accumulate(&mut self, delta: f32) {
        self.accumulated += f64::from(delta);
    }

    /// Take one step if a whole one is available
    pub fn consume_step(&mut self) -> bool {
        if self.step > 0.0 && self.accumulated >= self.step {
            self.accumulated -= self.step;
            true
        } else {
            false
        }
    }

    /// Fraction of a step left over, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            (self.accumulated / self.step) as f32
        } else {
            0.0
        }
    }

    /// Unconsumed time in seconds
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Step length in seconds
    pub fn step(&self) -> f32 {
        self.step as f32
    }

    /// Change the step length, keeping the accumulated time
    pub fn set_step(&mut self, step: f32) {
        self.step = f64::from(step);
    }

    /// Drop the accumulated time
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// Shared flag a callback can use to end the loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Rc<Cell<bool>>,
}

impl StopHandle {
    /// End the loop after the current iteration
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    /// Has a stop been requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    fn reset(&self) {
        self.stopped.set(false);
    }
}

type Callback<'a> = Box<dyn FnMut(f32) -> Result<(), AppError> + 'a>;

/// Adapts an update/render closure pair to [`Application`]
struct CallbackApp<'a> {
    update: Callback<'a>,
    render: Callback<'a>,
}

impl Application for CallbackApp<'_> {
    fn update(&mut self, delta_time: f32) -> Result<(), AppError> {
        (self.update)(delta_time)
    }

    fn render(&mut self, alpha: f32) -> Result<(), AppError> {
        (self.render)(alpha)
    }
}

/// The main loop
pub struct GameLoop<'a, C: ClockSource = SystemClock> {
    time: TimeManager<C>,
    mode: TimestepMode,
    accumulator: FixedStepAccumulator,
    stop: StopHandle,
    update_fn: Option<Callback<'a>>,
    render_fn: Option<Callback<'a>>,
}

impl GameLoop<'_, SystemClock> {
    /// Fixed 60 Hz loop capped at 60 FPS on the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Loop on the wall clock configured from `config`
    pub fn from_config(config: &LoopConfig) -> Result<Self, EngineError> {
        Self::with_clock_and_config(SystemClock::new(), config)
    }

    /// Loop on the wall clock with the loop and clock sections of `config`
    pub fn from_engine_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::with_clock_and_engine_config(SystemClock::new(), config)
    }
}

impl Default for GameLoop<'_, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: ClockSource> GameLoop<'a, C> {
    /// Default settings on a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self::assemble(TimeManager::with_clock(clock), &LoopConfig::default())
    }

    /// Custom clock and settings; invalid settings are a configuration error
    pub fn with_clock_and_config(clock: C, config: &LoopConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Configuration)?;
        Ok(Self::assemble(TimeManager::with_clock(clock), config))
    }

    /// Custom clock with the loop and clock sections of a full engine config
    pub fn with_clock_and_engine_config(clock: C, config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Configuration)?;
        Ok(Self::assemble(
            TimeManager::from_config(clock, &config.time),
            &config.game_loop,
        ))
    }

    fn assemble(mut time: TimeManager<C>, config: &LoopConfig) -> Self {
        time.set_target_fps(config.target_fps);
        time.set_max_frame_delta(config.max_delta);
        Self {
            time,
            mode: config.mode,
            accumulator: FixedStepAccumulator::new(config.fixed_delta),
            stop: StopHandle::default(),
            update_fn: None,
            render_fn: None,
        }
    }

    /// Choose fixed or variable timestep
    pub fn set_mode(&mut self, mode: TimestepMode) {
        self.mode = mode;
    }

    /// Current timestep mode
    pub fn mode(&self) -> TimestepMode {
        self.mode
    }

    /// Set the fixed step length; non-positive values are rejected
    pub fn set_fixed_delta(&mut self, fixed_delta: f32) -> Result<(), EngineError> {
        if !(fixed_delta > 0.0) {
            return Err(EngineError::Configuration(format!(
                "fixed delta must be positive, got {fixed_delta}"
            )));
        }
        self.accumulator.set_step(fixed_delta);
        Ok(())
    }

    /// Fixed step length in seconds
    pub fn fixed_delta(&self) -> f32 {
        self.accumulator.step()
    }

    /// Cap the frame rate; `0` disables the cap
    pub fn set_target_fps(&mut self, fps: f32) {
        self.time.set_target_fps(fps);
    }

    /// Frame clock
    pub fn time(&self) -> &TimeManager<C> {
        &self.time
    }

    /// Frame clock, mutably (pause, time scale)
    pub fn time_mut(&mut self) -> &mut TimeManager<C> {
        &mut self.time
    }

    /// Handle that ends the loop when stopped
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request the loop to end after the current iteration
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Set the update callback used by [`start`](Self::start)
    pub fn set_update_fn(&mut self, update: impl FnMut(f32) -> Result<(), AppError> + 'a) {
        self.update_fn = Some(Box::new(update));
    }

    /// Set the render callback used by [`start`](Self::start)
    pub fn set_render_fn(&mut self, render: impl FnMut(f32) -> Result<(), AppError> + 'a) {
        self.render_fn = Some(Box::new(render));
    }

    /// Run the callbacks until the window closes or the loop is stopped
    pub fn start(&mut self, window: &mut dyn WindowSurface) -> Result<(), EngineError> {
        let (update, render) = match (self.update_fn.take(), self.render_fn.take()) {
            (Some(update), Some(render)) => (update, render),
            (update, render) => {
                self.update_fn = update;
                self.render_fn = render;
                return Err(EngineError::Configuration(
                    "update and render functions must be set before starting the game loop".to_string(),
                ));
            }
        };

        let mut app = CallbackApp { update, render };
        let result = self.run_application(&mut app, window);

        self.update_fn = Some(app.update);
        self.render_fn = Some(app.render);
        result
    }

    /// Run `app` until the window closes or the loop is stopped
    pub fn run_application(&mut self, app: &mut dyn Application, window: &mut dyn WindowSurface) -> Result<(), EngineError> {
        self.stop.reset();
        self.accumulator.reset();
        app.on_start()?;
        self.time.resync();

        log::info!(
            "Starting game loop ({:?} timestep, step {:.4}s, target {} FPS)",
            self.mode,
            self.accumulator.step(),
            self.time.target_fps()
        );

        while !self.stop.is_stopped() && !window.should_close() {
            if let Err(err) = self.frame(app) {
                log::error!("Game loop stopped by error: {}", err);
                app.on_stop();
                return Err(err.into());
            }
            window.present();
            self.time.sleep_for_frame_limit();
        }

        app.on_stop();
        log::info!("Game loop finished after {} frames", self.time.frame_count());
        Ok(())
    }

    fn frame(&mut self, app: &mut dyn Application) -> Result<(), AppError> {
        self.time.update();
        let delta = self.time.unscaled_delta_time();

        match self.mode {
            TimestepMode::Fixed => {
                let step = self.accumulator.step();
                self.accumulator.accumulate(delta);
                while self.accumulator.consume_step() {
                    app.update(step)?;
                }
                app.render(self.accumulator.alpha())
            }
            TimestepMode::Variable => {
                app.update(delta)?;
                app.render(1.0)
            }
        }
    }
}
