//! Game configuration
//!
//! Read from `config.toml` in the data directory. Every key is optional:
//! ```toml
//! display_count = 5
//! feedback_delay_ms = 1000
//! correct_points = 10
//! miss_penalty = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::round::DEFAULT_DISPLAY_COUNT;

const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("display_count must be at least 1")]
    InvalidDisplayCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Word cards shown at once
    pub display_count: usize,
    /// How long a correct pair stays on screen before it is replaced
    pub feedback_delay_ms: u64,
    pub correct_points: u32,
    /// Subtracted on a wrong pair; the score never drops below zero
    pub miss_penalty: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            display_count: DEFAULT_DISPLAY_COUNT,
            feedback_delay_ms: 1000,
            correct_points: 10,
            miss_penalty: 5,
        }
    }
}

impl GameConfig {
    /// Path of the config file inside a data directory
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config, falling back to defaults when no file exists
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        log::info!("Loaded game config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.display_count == 0 {
            return Err(ConfigError::InvalidDisplayCount);
        }
        Ok(config)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}
