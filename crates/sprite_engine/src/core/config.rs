//! # Engine Configuration
//!
//! Every tunable the engine reads at startup, grouped by subsystem. All
//! structs are serde types with sensible defaults, so a config file only
//! needs to mention what it changes.
//!
//! ```toml
//! log_level = "debug"
//!
//! [game_loop]
//! mode = "Variable"
//! target_fps = 144.0
//!
//! [camera]
//! max_zoom = 4.0
//! bounds = [0.0, 0.0, 4096.0, 2048.0]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::logging;
use crate::foundation::time::{DEFAULT_HISTORY_SIZE, MAX_FRAME_DELTA};
use crate::render::batch_renderer::DEFAULT_MAX_SPRITES;
use crate::render::camera::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};

/// How the loop advances simulation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimestepMode {
    /// Constant-size update steps with render interpolation
    #[default]
    Fixed,
    /// One update per frame with the measured delta
    Variable,
}

/// Game loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed or variable timestep
    pub mode: TimestepMode,
    /// Length of one fixed update step in seconds
    pub fixed_delta: f32,
    /// Frame-rate cap; `0` means uncapped
    pub target_fps: f32,
    /// Longest frame delta fed to the simulation
    pub max_delta: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            mode: TimestepMode::Fixed,
            fixed_delta: 1.0 / 60.0,
            target_fps: 60.0,
            max_delta: MAX_FRAME_DELTA,
        }
    }
}

impl LoopConfig {
    /// Builder pattern: set the timestep mode
    pub fn with_mode(mut self, mode: TimestepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder pattern: set the fixed step length
    pub fn with_fixed_delta(mut self, fixed_delta: f32) -> Self {
        self.fixed_delta = fixed_delta;
        self
    }

    /// Builder pattern: set the frame-rate cap
    pub fn with_target_fps(mut self, target_fps: f32) -> Self {
        self.target_fps = target_fps;
        self
    }

    /// Check the values make sense
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fixed_delta > 0.0) {
            return Err(format!("fixed_delta must be positive, got {}", self.fixed_delta));
        }
        if !(self.max_delta > 0.0) {
            return Err(format!("max_delta must be positive, got {}", self.max_delta));
        }
        if self.target_fps < 0.0 {
            return Err(format!("target_fps cannot be negative, got {}", self.target_fps));
        }
        Ok(())
    }
}

/// Frame clock settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Samples kept for min/max/average delta
    pub history_size: usize,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

/// Sprite batch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Sprites per draw call before a forced flush
    pub max_sprites: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_sprites: DEFAULT_MAX_SPRITES,
        }
    }
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Smallest allowed zoom
    pub min_zoom: f32,
    /// Largest allowed zoom
    pub max_zoom: f32,
    /// Optional world rectangle `[min_x, min_y, max_x, max_y]` the view stays inside
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f32; 4]>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            bounds: None,
        }
    }
}

impl CameraConfig {
    /// Check the values make sense
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err("viewport size must be positive".to_string());
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(format!(
                "zoom range must satisfy 0 < min <= max, got [{}, {}]",
                self.min_zoom, self.max_zoom
            ));
        }
        if let Some([min_x, min_y, max_x, max_y]) = self.bounds {
            if !(min_x < max_x && min_y < max_y) {
                return Err(format!(
                    "camera bounds are empty: ({min_x}, {min_y}) .. ({max_x}, {max_y})"
                ));
            }
        }
        Ok(())
    }
}

/// Sprite shader source locations, handed to the backend for compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Path to the vertex shader
    pub vertex_shader_path: String,
    /// Path to the fragment shader
    pub fragment_shader_path: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::new("assets/shaders/batch.vert", "assets/shaders/batch.frag")
    }
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Loop settings
    pub game_loop: LoopConfig,
    /// Clock settings
    pub time: TimeConfig,
    /// Batch settings
    pub batch: BatchConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Sprite shader sources
    pub shader: ShaderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            game_loop: LoopConfig::default(),
            time: TimeConfig::default(),
            batch: BatchConfig::default(),
            camera: CameraConfig::default(),
            shader: ShaderConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Builder pattern: set the loop settings
    pub fn with_loop(mut self, game_loop: LoopConfig) -> Self {
        self.game_loop = game_loop;
        self
    }

    /// Builder pattern: set the camera settings
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Builder pattern: set the default log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.game_loop.validate()?;
        self.camera.validate()?;
        if self.batch.max_sprites == 0 {
            return Err("batch.max_sprites must be at least 1".to_string());
        }
        if self.time.history_size == 0 {
            return Err("time.history_size must be at least 1".to_string());
        }
        Ok(())
    }

    /// Start logging with `log_level` as the fallback filter
    pub fn init_logging(&self) {
        logging::init_with_level(&self.log_level);
    }

    /// Load from a `.toml`/`.ron` file and validate
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for EngineConfig {}
