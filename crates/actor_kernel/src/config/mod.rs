//! Kernel settings on disk
//!
//! Settings types derive serde and implement [`Config`], which reads and
//! writes them as TOML or RON depending on the file extension.

pub mod kernel;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use kernel::{FrameConfig, InputConfig, KernelConfig, LoggingConfig};

/// On-disk formats a settings file may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from `path`'s extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, ConfigError> {
        let result = match self {
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str(text).map_err(|e| e.to_string()),
        };
        result.map_err(|message| ConfigError::Parse { format: self, message })
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        let result = match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| e.to_string()),
        };
        result.map_err(|message| ConfigError::Serialize { format: self, message })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Ron => "RON",
        })
    }
}

/// A settings type that can be loaded from and saved to disk
///
/// Every section should be `#[serde(default)]` so a file only names what
/// it overrides.
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Read settings from `path`
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        format.parse(&text)
    }

    /// Read settings from TOML text
    fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        ConfigFormat::Toml.parse(text)
    }

    /// Write settings to `path`, replacing the file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = ConfigFormat::from_path(path)?.render(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Failures loading or saving settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read or written
    #[error("Cannot access config file '{}': {source}", .path.display())]
    Io {
        /// File that was accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid settings in its format
    #[error("Invalid {format} config: {message}")]
    Parse {
        /// Format the text was read as
        format: ConfigFormat,
        /// Parser message
        message: String,
    },

    /// The settings could not be written in the requested format
    #[error("Cannot write {format} config: {message}")]
    Serialize {
        /// Requested format
        format: ConfigFormat,
        /// Serializer message
        message: String,
    },

    /// The extension names no known format
    #[error("No config format for '{}' (expected .toml or .ron)", .0.display())]
    UnsupportedFormat(PathBuf),
}
