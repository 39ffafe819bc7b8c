//! Demo configuration file.
//!
//! ```toml
//! [menu]
//! timeout_secs = 30
//! author_only = true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use neon_menu::MenuConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level demo configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Options passed to every menu
    #[serde(default)]
    pub menu: MenuConfig,
}

impl DemoConfig {
    /// Load from `path`, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.menu.validate()?;

        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, timeout_secs: Option<u64>, allow_anyone: bool) -> Self {
        if let Some(timeout_secs) = timeout_secs {
            self.menu.timeout_secs = timeout_secs;
        }
        if allow_anyone {
            self.menu.author_only = false;
        }
        self
    }
}
