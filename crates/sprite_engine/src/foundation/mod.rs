//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and 2D transform helpers
//! - Time management (frame clock, timers, stopwatches)
//! - Logging utilities

pub mod logging;
pub mod math;
pub mod time;
