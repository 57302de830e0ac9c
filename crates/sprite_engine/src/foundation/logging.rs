//! Logging utilities
//!
//! Thin layer over `log` + `env_logger`. `RUST_LOG` still wins when it is set;
//! the level passed to [`init_with_level`] is only the fallback.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default filter such as `"info"` or `"sprite_engine=debug"`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}
