use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Default config file name, looked up in the working directory.
    pub const FILE_NAME: &'static str = "inertia.toml";

    /// Loads configuration from `inertia.toml` in the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Loads configuration from a specific path.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inertia.assets_path.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "assets_path must not be empty".to_string(),
            });
        }

        if self.inertia.template.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "template must not be empty".to_string(),
            });
        }

        if self.inertia.root_element.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "root_element must not be empty".to_string(),
            });
        }

        if self.inertia.prefix_bytes == 0 {
            return Err(ConfigError::ValidationError {
                message: "prefix_bytes must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
