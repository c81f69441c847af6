//! PS/2 controller configuration
//!
//! Port numbers plus the status bits that signal a buffered byte or a
//! corrupt one. The defaults are the standard i8042 layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// i8042 status register
pub const DEFAULT_STATUS_PORT: u16 = 0x64;
/// i8042 data port
pub const DEFAULT_DATA_PORT: u16 = 0x60;
/// Output buffer full ("data in buffer")
pub const DEFAULT_DATA_READY_MASK: u8 = 0x01;
/// Timeout (bit 6) and parity (bit 7) errors
pub const DEFAULT_ERROR_MASK: u8 = 0xC0;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("status and data port are both 0x{0:04X}")]
    SharedPort(u16),

    #[error("data-ready mask is empty")]
    EmptyReadyMask,

    #[error("error mask overlaps data-ready mask (0x{0:02x})")]
    OverlappingMasks(u8),
}

/// PS/2 keyboard controller ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ps2Config {
    /// Port read to check for a buffered byte
    pub status_port: u16,
    /// Port the scan code byte is read from
    pub data_port: u16,
    /// Status bits that mean "a byte is ready"
    pub data_ready_mask: u8,
    /// Status bits that mean "the buffered byte is corrupt"; zero disables the check
    pub error_mask: u8,
}

impl Ps2Config {
    /// Checks the configuration for values the device cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status_port == self.data_port {
            return Err(ConfigError::SharedPort(self.status_port));
        }
        if self.data_ready_mask == 0 {
            return Err(ConfigError::EmptyReadyMask);
        }
        let overlap = self.data_ready_mask & self.error_mask;
        if overlap != 0 {
            return Err(ConfigError::OverlappingMasks(overlap));
        }
        Ok(())
    }

    /// Returns true if `status` reports a buffered byte
    pub fn data_ready(&self, status: u8) -> bool {
        status & self.data_ready_mask != 0
    }

    /// Returns true if `status` flags the buffered byte as corrupt
    pub fn transmission_error(&self, status: u8) -> bool {
        status & self.error_mask != 0
    }
}

impl Default for Ps2Config {
    fn default() -> Self {
        Self {
            status_port: DEFAULT_STATUS_PORT,
            data_port: DEFAULT_DATA_PORT,
            data_ready_mask: DEFAULT_DATA_READY_MASK,
            error_mask: DEFAULT_ERROR_MASK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Ps2Config::default();
        assert_eq!(config.status_port, 0x64);
        assert_eq!(config.data_port, 0x60);
        assert_eq!(config.error_mask, 0xC0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_shared_port_rejected() {
        let config = Ps2Config {
            status_port: 0x60,
            ..Ps2Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SharedPort(0x60)));
    }

    #[test]
    fn test_empty_mask_rejected() {
        let config = Ps2Config {
            data_ready_mask: 0,
            ..Ps2Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyReadyMask));
    }

    #[test]
    fn test_overlapping_masks_rejected() {
        let config = Ps2Config {
            error_mask: 0x81,
            ..Ps2Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OverlappingMasks(0x01)));
    }

    #[test]
    fn test_data_ready() {
        let config = Ps2Config::default();
        assert!(config.data_ready(0x01));
        assert!(config.data_ready(0x1D));
        assert!(!config.data_ready(0x1C));
    }

    #[test]
    fn test_transmission_error() {
        let config = Ps2Config::default();
        assert!(!config.transmission_error(0x01));
        assert!(config.transmission_error(0x41));
        assert!(config.transmission_error(0x81));

        let unchecked = Ps2Config {
            error_mask: 0,
            ..config
        };
        assert!(!unchecked.transmission_error(0xC1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Ps2Config = serde_json::from_str(r#"{"data_port": 352}"#).unwrap();
        assert_eq!(config.data_port, 0x160);
        assert_eq!(config.status_port, DEFAULT_STATUS_PORT);
        assert_eq!(config.data_ready_mask, DEFAULT_DATA_READY_MASK);
        assert_eq!(config.error_mask, DEFAULT_ERROR_MASK);
    }
}
