//! Configuration types for playback timing.

use serde::{Deserialize, Serialize};

/// Logical frame rate at 1x speed.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Duration of one logical frame at 1x speed, in milliseconds.
pub const BASE_FRAME_MS: f64 = 1000.0 / DEFAULT_FRAME_RATE;

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

fn default_speed() -> f64 {
    1.0
}

fn default_speed_presets() -> Vec<f64> {
    vec![0.5, 1.0, 2.0, 4.0]
}

/// Playback engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Logical frames per second at 1x speed.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Speed multiplier applied when the engine is created.
    #[serde(default = "default_speed")]
    pub default_speed: f64,
    /// Speed choices offered to the user. The engine accepts any positive speed.
    #[serde(default = "default_speed_presets")]
    pub speed_presets: Vec<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            default_speed: default_speed(),
            speed_presets: default_speed_presets(),
        }
    }
}

#[inline]
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl PlaybackConfig {
    /// Duration of one logical frame at 1x speed, in milliseconds.
    #[inline]
    pub fn base_frame_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.frame_rate) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if !is_positive(self.default_speed) {
            return Err(ConfigError::InvalidDefaultSpeed(self.default_speed));
        }
        if self.speed_presets.is_empty() {
            return Err(ConfigError::NoSpeedPresets);
        }
        for (index, &value) in self.speed_presets.iter().enumerate() {
            if !is_positive(value) {
                return Err(ConfigError::InvalidSpeedPreset { index, value });
            }
        }
        Ok(())
    }

    /// Preset following `current`, wrapping to the first one.
    pub fn next_preset(&self, current: f64) -> Option<f64> {
        self.speed_presets
            .iter()
            .copied()
            .find(|&p| p > current)
            .or_else(|| self.speed_presets.first().copied())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),
    #[error("Default speed must be positive and finite, got {0}")]
    InvalidDefaultSpeed(f64),
    #[error("At least one speed preset is required")]
    NoSpeedPresets,
    #[error("Speed preset {index} must be positive and finite, got {value}")]
    InvalidSpeedPreset { index: usize, value: f64 },
}
