//! Core engine types shared across subsystems

pub mod config;
