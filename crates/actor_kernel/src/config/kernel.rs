//! # Kernel Configuration
//!
//! Settings consumed by the frame driver, the input snapshot builder and the
//! logging setup. Every section falls back to its defaults, so a config file
//! only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use super::Config;

/// Frame pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound for a single simulation step, in seconds
    pub max_delta_time: f32,
    /// Frame time the driver aims for, in seconds
    pub target_frame_time: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_delta_time: 0.05,
            target_frame_time: 0.016,
        }
    }
}

/// Analog input filtering settings (raw axis units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Trigger values at or below this read as zero
    pub trigger_dead_zone: i32,
    /// Trigger values at or above this read as full
    pub trigger_max: i32,
    /// Stick deflections shorter than this read as zero
    pub stick_dead_zone: f32,
    /// Stick deflections longer than this read as full
    pub stick_max: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            trigger_dead_zone: 250,
            trigger_max: 30000,
            stick_dead_zone: 8000.0,
            stick_max: 30000.0,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Top-level kernel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Frame pacing
    pub frame: FrameConfig,
    /// Input filtering
    pub input: InputConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Config for KernelConfig {}
