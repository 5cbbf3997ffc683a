use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("screen size must be positive, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    #[error("frame rate must be positive")]
    InvalidFrameRate,
    #[error("time scale must be finite and non-negative, got {0}")]
    InvalidTimeScale(f32),
    #[error("max elapsed must be finite and positive, got {0}")]
    InvalidMaxElapsed(f32),
    #[error("max frame skip must be at least 1")]
    InvalidFrameSkip,
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Startup settings for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Screen width in pixels.
    pub width: i32,
    /// Screen height in pixels.
    pub height: i32,
    /// Target frames per second; also the tick rate under a fixed timestep.
    pub frame_rate: u32,
    /// Run whole ticks at `frame_rate` instead of one update per frame.
    pub fixed: bool,
    /// Multiplier applied to measured elapsed time.
    pub time_scale: f32,
    /// Upper bound, in seconds, on the elapsed time of a single update.
    pub max_elapsed: f32,
    /// Most ticks a fixed-timestep frame may run to catch up.
    pub max_frame_skip: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            frame_rate: 60,
            fixed: false,
            time_scale: 1.0,
            max_elapsed: 0.0333,
            max_frame_skip: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        if !self.max_elapsed.is_finite() || self.max_elapsed <= 0.0 {
            return Err(ConfigError::InvalidMaxElapsed(self.max_elapsed));
        }
        if self.max_frame_skip == 0 {
            return Err(ConfigError::InvalidFrameSkip);
        }
        Ok(())
    }

    /// Length of one tick at the target frame rate.
    pub fn rate(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    /// Most time a fixed-timestep frame will try to catch up on.
    pub fn skip(&self) -> Duration {
        self.rate() * self.max_frame_skip
    }

    /// Clamp and scale a measured delta.
    pub fn elapsed(&self, delta: Duration) -> f32 {
        delta.as_secs_f32().min(self.max_elapsed) * self.time_scale
    }
}
