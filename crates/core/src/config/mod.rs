//! Configuration for cvar-unhide
//!
//! A single TOML file under the game directory:
//!
//! ```toml
//! version = 1
//! debug = false
//! require_insecure = true
//! list_name_width = 41
//! ```
//!
//! Missing files are created with defaults; missing keys take their default
//! value.

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{addon_dir, configs_dir, core_config_path, ADDON_DIR_NAME};

use crate::commands::scanner::LIST_NAME_WIDTH;

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Core plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Refuse to load unless the game was started with `-insecure`
    pub require_insecure: bool,

    /// Width of the name column in `cvarlist_all`
    pub list_name_width: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            require_insecure: true,
            list_name_width: LIST_NAME_WIDTH,
        }
    }
}

impl CoreConfig {
    /// Load core config from the game directory, creating default if missing.
    pub fn load(game_dir: &Path) -> ConfigResult<Self> {
        Self::load_from(&core_config_path(game_dir))
    }

    /// Load config from an explicit path, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to a path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload config from a path.
    ///
    /// Updates self with the current file contents.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }
}
