//! Keyboard driver configuration
//!
//! Loaded from JSON. Missing fields fall back to defaults; documents with an
//! unknown `version` are rejected.

use hal_x86_64::Ps2Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current configuration format version
pub const CONFIG_VERSION: u32 = 1;

/// Default number of bytes a single drain may consume
///
/// Bounds the time spent in one interrupt.
pub const DEFAULT_DRAIN_LIMIT: usize = 64;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to parse keyboard config: {0}")]
    Parse(String),

    #[error("failed to serialize keyboard config: {0}")]
    Serialize(String),

    #[error("unsupported keyboard config version: {0}")]
    UnsupportedVersion(u32),

    #[error("drain limit must be at least 1")]
    ZeroDrainLimit,

    #[error("invalid PS/2 settings: {0}")]
    Ps2(#[from] hal_x86_64::ConfigError),
}

/// Keyboard driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub version: u32,
    /// Controller ports
    pub ps2: Ps2Config,
    /// Maximum bytes consumed per `drain`
    pub drain_limit: usize,
}

impl KeyboardConfig {
    /// Parses and validates a JSON document
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty-printed JSON
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.drain_limit == 0 {
            return Err(ConfigError::ZeroDrainLimit);
        }
        self.ps2.validate()?;
        Ok(())
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ps2: Ps2Config::default(),
            drain_limit: DEFAULT_DRAIN_LIMIT,
        }
    }
}
