//! x86_64 PS/2 Keyboard implementation
//!
//! Reads scan code bytes from the i8042 controller:
//! 1. Read the status register and test the data-in-buffer bit
//! 2. If set, read one byte from the data port
//! 3. If the status also flagged a parity or timeout error, the byte is
//!    dropped and `KeyboardError::Transmission` is returned instead
//!
//! No decoding happens here. Bytes, including 0xE0 prefixes and break codes,
//! are handed upward untouched.

use hal::keyboard::{KeyboardDevice, KeyboardError};

use crate::config::Ps2Config;
use crate::port_io::{PortIo, RealPortIo};

/// x86_64 PS/2 keyboard device
pub struct X86Ps2Keyboard<P: PortIo = RealPortIo> {
    io: P,
    config: Ps2Config,
}

impl<P: PortIo> X86Ps2Keyboard<P> {
    /// Creates a keyboard on the standard i8042 ports
    pub fn new(io: P) -> Self {
        Self::with_config(io, Ps2Config::default())
    }

    /// Creates a keyboard on explicitly configured ports
    pub fn with_config(io: P, config: Ps2Config) -> Self {
        Self { io, config }
    }

    pub fn config(&self) -> &Ps2Config {
        &self.config
    }

    /// Port backend (used by tests to inspect the fake)
    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut P {
        &mut self.io
    }

    fn status_ready(&mut self) -> bool {
        let status = self.io.inb(self.config.status_port);
        self.config.data_ready(status)
    }

    /// One status read, then the data byte if one is buffered
    fn read_buffered(&mut self) -> Result<Option<u8>, KeyboardError> {
        let status = self.io.inb(self.config.status_port);
        if !self.config.data_ready(status) {
            return Ok(None);
        }
        // Always consumed, or the controller keeps reporting the same byte.
        let byte = self.io.inb(self.config.data_port);
        if self.config.transmission_error(status) {
            return Err(KeyboardError::Transmission(status));
        }
        Ok(Some(byte))
    }
}

impl<P: PortIo> KeyboardDevice for X86Ps2Keyboard<P> {
    fn has_data(&mut self) -> bool {
        self.status_ready()
    }

    fn read_scancode(&mut self) -> Result<u8, KeyboardError> {
        self.read_buffered()?.ok_or(KeyboardError::NoData)
    }

    // One status read per byte instead of two.
    fn poll_scancode(&mut self) -> Result<Option<u8>, KeyboardError> {
        self.read_buffered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port_io::FakePortIo;

    fn keyboard_with(bytes: &[u8]) -> X86Ps2Keyboard<FakePortIo> {
        let config = Ps2Config::default();
        let mut io = FakePortIo::new();
        io.script_scancodes(
            config.status_port,
            config.data_port,
            config.data_ready_mask,
            bytes,
        );
        X86Ps2Keyboard::with_config(io, config)
    }

    #[test]
    fn test_poll_reads_bytes_until_empty() {
        let mut keyboard = keyboard_with(&[0x1E, 0x9E]);

        assert_eq!(keyboard.poll_scancode(), Ok(Some(0x1E)));
        assert_eq!(keyboard.poll_scancode(), Ok(Some(0x9E)));
        assert_eq!(keyboard.poll_scancode(), Ok(None));
        assert_eq!(keyboard.io().remaining_reads(), 0);
    }

    #[test]
    fn test_prefix_is_passed_through() {
        let mut keyboard = keyboard_with(&[0xE0, 0x48]);
        assert_eq!(keyboard.poll_scancode(), Ok(Some(0xE0)));
        assert_eq!(keyboard.poll_scancode(), Ok(Some(0x48)));
    }

    #[test]
    fn test_has_data_then_read() {
        let mut io = FakePortIo::new();
        io.script_read(0x64, 0x01);
        io.script_read(0x64, 0x01);
        io.script_read(0x60, 0x2A);
        let mut keyboard = X86Ps2Keyboard::new(io);

        assert!(keyboard.has_data());
        assert_eq!(keyboard.read_scancode(), Ok(0x2A));
    }

    #[test]
    fn test_read_without_data() {
        let mut io = FakePortIo::new();
        io.script_read(0x64, 0x00);
        let mut keyboard = X86Ps2Keyboard::new(io);

        assert_eq!(keyboard.read_scancode(), Err(KeyboardError::NoData));
        assert_eq!(keyboard.io().remaining_reads(), 0);
    }

    #[test]
    fn test_custom_ports() {
        let config = Ps2Config {
            status_port: 0x164,
            data_port: 0x160,
            data_ready_mask: 0x02,
            error_mask: 0,
        };
        let mut io = FakePortIo::new();
        io.script_read(0x164, 0x01);
        io.script_read(0x164, 0x02);
        io.script_read(0x160, 0x10);
        let mut keyboard = X86Ps2Keyboard::with_config(io, config);

        // 0x01 does not match the configured mask.
        assert_eq!(keyboard.poll_scancode(), Ok(None));
        assert_eq!(keyboard.poll_scancode(), Ok(Some(0x10)));
    }

    #[test]
    fn test_parity_error_drops_byte() {
        let mut io = FakePortIo::new();
        io.script_read(0x64, 0x81); // Ready + parity error
        io.script_read(0x60, 0x3F);
        io.script_read(0x64, 0x01);
        io.script_read(0x60, 0x1E);
        let mut keyboard = X86Ps2Keyboard::new(io);

        assert_eq!(
            keyboard.poll_scancode(),
            Err(KeyboardError::Transmission(0x81))
        );
        // The corrupt byte was consumed; the next one is clean.
        assert_eq!(keyboard.poll_scancode(), Ok(Some(0x1E)));
        assert_eq!(keyboard.io().remaining_reads(), 0);
    }

    #[test]
    fn test_timeout_error_on_read_scancode() {
        let mut io = FakePortIo::new();
        io.script_read(0x64, 0x41); // Ready + timeout
        io.script_read(0x60, 0x00);
        let mut keyboard = X86Ps2Keyboard::new(io);

        assert_eq!(
            keyboard.read_scancode(),
            Err(KeyboardError::Transmission(0x41))
        );
    }

    #[test]
    fn test_error_bits_without_data_are_ignored() {
        let mut io = FakePortIo::new();
        io.script_read(0x64, 0xC0);
        let mut keyboard = X86Ps2Keyboard::new(io);

        assert_eq!(keyboard.poll_scancode(), Ok(None));
    }
}
