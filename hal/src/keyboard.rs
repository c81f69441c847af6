//! Keyboard device abstraction
//!
//! This module defines the interface that architecture-specific keyboard
//! implementations provide, plus the per-byte event view used by the decoder.
//!
//! ## Philosophy
//!
//! - **Hardware is just a source**: Devices hand out raw scan code bytes, nothing more
//! - **Stateless devices**: Modifier and escape tracking live in the decoder
//! - **Testable**: Devices can be replaced by scripted fakes
//!
//! ## Design
//!
//! The device interface is minimal and poll-based:
//! - `has_data()` reports whether a byte is waiting
//! - `read_scancode()` fetches it, and must only be called after `has_data()`

use thiserror::Error;

use crate::keymap::scancode::{EXTENDED_PREFIX, RELEASE_BIT};

/// Keyboard device errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyboardError {
    /// A read was attempted while the controller had no byte buffered
    #[error("no scancode available")]
    NoData,

    /// The controller flagged the buffered byte as corrupt (parity or
    /// timeout); carries the raw status register
    #[error("keyboard transmission error (status 0x{0:02x})")]
    Transmission(u8),
}

/// One raw scan code byte, classified against the decoder's escape state
///
/// Derived per decode call and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScancodeEvent {
    /// Byte as read from the controller
    pub raw: u8,
    /// Break code (bit 7 set)
    pub release: bool,
    /// The previous byte was the 0xE0 prefix
    pub extended: bool,
}

impl ScancodeEvent {
    /// Classifies `raw` given whether an extended prefix is pending
    pub fn classify(raw: u8, escape_pending: bool) -> Self {
        Self {
            raw,
            release: raw & RELEASE_BIT != 0,
            extended: escape_pending,
        }
    }

    /// Returns true if this byte is the extended-key prefix itself
    pub fn is_prefix(&self) -> bool {
        self.raw == EXTENDED_PREFIX
    }

    /// Returns the table index this byte resolves to
    ///
    /// - Release after a prefix: the raw byte, bit 7 kept as part of the
    ///   extended identity
    /// - Plain release: bit 7 masked off, giving the make code
    /// - Press after a prefix: bit 7 set, selecting the extended half
    /// - Plain press: the raw byte
    pub fn lookup_code(&self) -> u8 {
        match (self.release, self.extended) {
            (true, true) => self.raw,
            (true, false) => self.raw & !RELEASE_BIT,
            (false, true) => self.raw | RELEASE_BIT,
            (false, false) => self.raw,
        }
    }
}

/// Keyboard device trait
///
/// Architecture-specific implementations provide raw scan code bytes
/// through this trait.
///
/// ## Example
///
/// ```rust,ignore
/// let mut keyboard = X86Ps2Keyboard::new(RealPortIo::new());
/// while let Some(byte) = keyboard.poll_scancode()? {
///     if let Some(c) = decoder.decode(byte) {
///         console.on_character(c);
///     }
/// }
/// ```
pub trait KeyboardDevice {
    /// Returns true if a scan code byte is ready to be read
    fn has_data(&mut self) -> bool;

    /// Reads the next scan code byte
    ///
    /// Only valid after `has_data()` returned true. Implementations return
    /// `KeyboardError::NoData` when nothing is buffered.
    fn read_scancode(&mut self) -> Result<u8, KeyboardError>;

    /// Reads a byte if one is ready, `Ok(None)` otherwise
    fn poll_scancode(&mut self) -> Result<Option<u8>, KeyboardError> {
        if !self.has_data() {
            return Ok(None);
        }
        self.read_scancode().map(Some)
    }
}
