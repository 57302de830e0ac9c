//! Sprite animation
//!
//! - [`AnimationClip`]: frames with per-frame durations and a time lookup
//! - [`SpriteSheet`] / [`AnimationBuilder`]: clips cut from a grid texture
//! - [`AnimationStateMachine`]: named states, trigger-driven transitions and
//!   a parameter bag for conditions

pub mod clip;
pub mod sprite_sheet;
pub mod state_machine;

pub use clip::{AnimationClip, Frame};
pub use sprite_sheet::{AnimationBuilder, SpriteSheet};
pub use state_machine::{AnimationState, AnimationStateMachine, AnimationTransition, ParameterValue, Parameters};

use thiserror::Error;

/// Result type for animation operations
pub type AnimationResult<T> = Result<T, AnimationError>;

/// Animation lookup and construction errors
#[derive(Debug, Error, PartialEq)]
pub enum AnimationError {
    /// A frame was requested from a clip with no frames
    #[error("Animation clip '{0}' has no frames")]
    EmptyClip(String),

    /// Sprite sheet cell index past the end of the grid
    #[error("Frame index {index} out of range (sheet has {frame_count} frames)")]
    FrameOutOfRange {
        /// Requested index
        index: u32,
        /// Cells in the sheet
        frame_count: u32,
    },

    /// Empty or inverted cell range
    #[error("Invalid frame range {start}..={end}")]
    InvalidFrameRange {
        /// First cell
        start: u32,
        /// Last cell
        end: u32,
    },

    /// Frame and duration lists differ in length
    #[error("{frames} frames but {durations} durations")]
    MismatchedDurations {
        /// Number of frame indices
        frames: usize,
        /// Number of durations
        durations: usize,
    },

    /// Cell size is zero or larger than the texture
    #[error("Frame size {frame_width}x{frame_height} does not fit texture {texture_width}x{texture_height}")]
    InvalidFrameSize {
        /// Cell width
        frame_width: u32,
        /// Cell height
        frame_height: u32,
        /// Texture width
        texture_width: u32,
        /// Texture height
        texture_height: u32,
    },

    /// No state with that name
    #[error("Animation state '{0}' not found")]
    StateNotFound(String),

    /// The machine has no states yet
    #[error("Animation state machine has no current state")]
    NoCurrentState,
}
