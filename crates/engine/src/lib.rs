//! Game loop for the punk runtime: timing, world switching and frame stats.
//!
//! # Invariants
//! - A world switch happens only after a full update and commit, never
//!   while the world is being walked.
//! - A fixed-timestep frame runs at most `max_frame_skip` ticks.
//! - Paused frames still poll the console and input.

mod clock;
mod config;
mod engine;
mod platform;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, Timings};
pub use platform::{Headless, Platform};

/// Returns the crate version string.
pub fn crate_info() -> &'static str {
    concat!("punk-engine v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_info_returns_version() {
        assert!(crate_info().starts_with("punk-engine v"));
    }
}
