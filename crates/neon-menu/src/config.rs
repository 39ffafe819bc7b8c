//! Menu configuration.
//!
//! ```toml
//! timeout_secs = 120
//! author_only = false
//! ```
//!
//! Missing fields take their defaults: a 60 second wait and author-only
//! dispatch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a [`MenuConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Runtime options for a [`ComponentMenu`](crate::ComponentMenu)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Seconds to wait for each interaction
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only the requesting user may operate the menu
    #[serde(default = "default_true")]
    pub author_only: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            author_only: true,
        }
    }
}

impl MenuConfig {
    /// Per-wait timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values that parse but cannot drive a menu
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
