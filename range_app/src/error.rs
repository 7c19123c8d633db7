//! Application errors

use actor_kernel::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the target range driver
#[derive(Error, Debug)]
pub enum AppError {
    /// Kernel configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Level file could not be read
    #[error("Failed to read level '{path}': {source}")]
    LevelIo {
        /// Path that was requested
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Level file is not valid TOML for a level
    #[error("Failed to parse level: {0}")]
    LevelParse(#[from] toml::de::Error),

    /// Level parsed but describes something the range cannot build
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
}
