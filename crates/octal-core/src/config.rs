//! Engine configuration
//!
//! Loaded from `~/.config/octal/engine.toml` by default. Every section falls
//! back to its defaults when missing from the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CoreError;
use crate::time::TimeConfig;

/// Default entity capacity of a scene, including the reserved null id.
pub const DEFAULT_MAX_ENTITIES: u32 = 5000;

/// All engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub app: AppConfig,
    pub ecs: EcsConfig,
    pub log: LogConfig,
    pub time: TimeConfig,
}

impl EngineConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("octal"))
    }

    /// Path of the default config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("engine.toml"))
    }

    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text =
            fs::read_to_string(path).map_err(|e| CoreError::Io(path.to_path_buf(), e))?;
        Self::from_toml(&text)
    }

    /// Load the default config file, or return defaults if it is missing or broken
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            info!("No engine config found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| CoreError::Io(dir.to_path_buf(), e))?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| CoreError::Io(path.to_path_buf(), e))?;
        info!("Saved engine config to {:?}", path);
        Ok(())
    }
}

/// Application loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name, used in log output
    pub name: String,
    /// Frames per second the loop paces itself to (0 = unpaced)
    pub target_fps: u32,
    /// Stop after this many frames. `None` runs until quit is requested.
    pub max_frames: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Testbed".to_string(),
            target_fps: 60,
            max_frames: None,
        }
    }
}

/// Entity/component storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    /// Size of the entity id space. Id 0 is reserved, so at most
    /// `max_entities - 1` entities can be alive at once.
    pub max_entities: u32,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `octal_ecs=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Include file and line in each record
    pub with_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_location: true,
        }
    }
}
