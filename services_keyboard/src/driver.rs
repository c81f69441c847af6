//! Keyboard driver loop
//!
//! Pulls bytes from a `KeyboardDevice`, feeds them to the decoder and pushes
//! every produced character into a `CharacterSink`.

use hal::{KeyboardDevice, KeyboardError, ModifierState, ScancodeDecoder};
use input_types::KeyChar;
use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::{KeyboardConfig, DEFAULT_DRAIN_LIMIT};

/// Driver error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("keyboard device: {0}")]
    Device(#[from] KeyboardError),
}

/// Downstream consumer of decoded characters
///
/// Called once per produced character, never for "no character".
pub trait CharacterSink {
    fn on_character(&mut self, c: KeyChar);
}

impl<F: FnMut(KeyChar)> CharacterSink for F {
    fn on_character(&mut self, c: KeyChar) {
        self(c)
    }
}

impl CharacterSink for Vec<KeyChar> {
    fn on_character(&mut self, c: KeyChar) {
        self.push(c);
    }
}

/// Poll result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// The device had no byte buffered
    NoData,
    /// A byte was decoded without producing a character
    Consumed,
    /// A byte was decoded and its character delivered
    Delivered(KeyChar),
}

/// Driver counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub bytes_read: u64,
    pub chars_delivered: u64,
    /// Prefixes, releases, modifiers and unmapped keys
    pub bytes_without_char: u64,
    /// Drains that stopped at the limit with data still buffered
    pub drain_limit_hits: u64,
    /// Reads the device reported as failed
    pub device_errors: u64,
}

/// Keyboard driver
///
/// Owns the device and the decoder state for one keyboard session.
pub struct KeyboardDriver<D: KeyboardDevice> {
    device: D,
    decoder: ScancodeDecoder,
    drain_limit: usize,
    stats: DriverStats,
}

impl<D: KeyboardDevice> KeyboardDriver<D> {
    /// Creates a driver with the default drain limit
    pub fn new(device: D) -> Self {
        Self {
            device,
            decoder: ScancodeDecoder::new(),
            drain_limit: DEFAULT_DRAIN_LIMIT,
            stats: DriverStats::default(),
        }
    }

    /// Creates a driver using the drain limit from `config`
    pub fn with_config(device: D, config: &KeyboardConfig) -> Self {
        let mut driver = Self::new(device);
        driver.drain_limit = config.drain_limit.max(1);
        driver
    }

    /// Decodes a byte the caller already read from the hardware
    ///
    /// Delivers the character to `sink` if one is produced.
    pub fn handle_scancode<S: CharacterSink + ?Sized>(
        &mut self,
        raw: u8,
        sink: &mut S,
    ) -> Option<KeyChar> {
        self.stats.bytes_read += 1;

        let before = *self.decoder.state();
        let decoded = self.decoder.decode(raw);
        let after = self.decoder.state();
        trace!("scancode 0x{:02x} -> {:?}", raw, decoded);

        if before.modifiers() != after.modifiers() || before.locks() != after.locks() {
            debug!(
                "keyboard modifiers {} locks 0x{:02x}",
                after.modifiers(),
                after.locks().bits()
            );
        }

        match decoded {
            Some(c) => {
                sink.on_character(c);
                self.stats.chars_delivered += 1;
            }
            None => self.stats.bytes_without_char += 1,
        }
        decoded
    }

    /// Reads and decodes at most one byte
    pub fn poll<S: CharacterSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<PollResult, DriverError> {
        let raw = match self.device.poll_scancode() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(PollResult::NoData),
            Err(err) => {
                self.stats.device_errors += 1;
                warn!("keyboard read failed: {}", err);
                return Err(err.into());
            }
        };
        Ok(match self.handle_scancode(raw, sink) {
            Some(c) => PollResult::Delivered(c),
            None => PollResult::Consumed,
        })
    }

    /// Processes every buffered byte, up to the drain limit
    ///
    /// This is the interrupt handler entry point. Returns the number of
    /// characters delivered.
    pub fn drain<S: CharacterSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<usize, DriverError> {
        let mut delivered = 0;
        for _ in 0..self.drain_limit {
            match self.poll(sink)? {
                PollResult::NoData => return Ok(delivered),
                PollResult::Consumed => {}
                PollResult::Delivered(_) => delivered += 1,
            }
        }
        if !self.device.has_data() {
            return Ok(delivered);
        }
        self.stats.drain_limit_hits += 1;
        warn!(
            "keyboard drain stopped after {} bytes with input pending",
            self.drain_limit
        );
        Ok(delivered)
    }

    /// Returns the decoder to its initial state
    ///
    /// Used when the device session is re-initialized.
    pub fn reset(&mut self) {
        debug!("keyboard decoder reset");
        self.decoder.reset();
    }

    pub fn state(&self) -> &ModifierState {
        self.decoder.state()
    }

    pub fn decoder(&self) -> &ScancodeDecoder {
        &self.decoder
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn drain_limit(&self) -> usize {
        self.drain_limit
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consumes the driver, returning the device
    pub fn into_device(self) -> D {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::keymap::scancode::{release, A, EXTENDED_PREFIX, LEFT_SHIFT};
    use std::collections::VecDeque;

    /// Fake keyboard for testing
    struct FakeKeyboard {
        bytes: VecDeque<u8>,
        fail_next: bool,
    }

    impl FakeKeyboard {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.iter().copied().collect(),
                fail_next: false,
            }
        }
    }

    impl KeyboardDevice for FakeKeyboard {
        fn has_data(&mut self) -> bool {
            self.fail_next || !self.bytes.is_empty()
        }

        fn read_scancode(&mut self) -> Result<u8, KeyboardError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(KeyboardError::Transmission(0x81));
            }
            self.bytes.pop_front().ok_or(KeyboardError::NoData)
        }
    }

    #[test]
    fn test_poll_no_data() {
        let mut driver = KeyboardDriver::new(FakeKeyboard::new(&[]));
        let mut out: Vec<KeyChar> = Vec::new();

        let result = driver.poll(&mut out).unwrap();
        assert_eq!(result, PollResult::NoData);
        assert!(out.is_empty());
        assert_eq!(driver.stats(), DriverStats::default());
    }

    #[test]
    fn test_poll_one_byte_at_a_time() {
        let mut driver = KeyboardDriver::new(FakeKeyboard::new(&[A, release(A)]));
        let mut out: Vec<KeyChar> = Vec::new();

        assert_eq!(
            driver.poll(&mut out).unwrap(),
            PollResult::Delivered(KeyChar::new(b'a'))
        );
        assert_eq!(driver.poll(&mut out).unwrap(), PollResult::Consumed);
        assert_eq!(driver.poll(&mut out).unwrap(), PollResult::NoData);
        assert_eq!(out, vec![KeyChar::new(b'a')]);
    }

    #[test]
    fn test_drain_counts_delivered() {
        let bytes = [LEFT_SHIFT, A, release(A), release(LEFT_SHIFT), A];
        let mut driver = KeyboardDriver::new(FakeKeyboard::new(&bytes));
        let mut out: Vec<KeyChar> = Vec::new();

        let delivered = driver.drain(&mut out).unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(out, vec![KeyChar::new(b'A'), KeyChar::new(b'a')]);

        let stats = driver.stats();
        assert_eq!(stats.bytes_read, 5);
        assert_eq!(stats.chars_delivered, 2);
        assert_eq!(stats.bytes_without_char, 3);
        assert_eq!(stats.drain_limit_hits, 0);
    }

    #[test]
    fn test_drain_respects_limit() {
        let config = KeyboardConfig {
            drain_limit: 2,
            ..KeyboardConfig::default()
        };
        let mut driver = KeyboardDriver::with_config(FakeKeyboard::new(&[A, A, A]), &config);
        let mut out: Vec<KeyChar> = Vec::new();

        assert_eq!(driver.drain(&mut out).unwrap(), 2);
        assert_eq!(driver.stats().drain_limit_hits, 1);

        assert_eq!(driver.drain(&mut out).unwrap(), 1);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_drain_exactly_at_limit_is_not_a_hit() {
        let config = KeyboardConfig {
            drain_limit: 2,
            ..KeyboardConfig::default()
        };
        let mut driver = KeyboardDriver::with_config(FakeKeyboard::new(&[A, A]), &config);
        let mut out: Vec<KeyChar> = Vec::new();

        assert_eq!(driver.drain(&mut out).unwrap(), 2);
        assert_eq!(driver.stats().drain_limit_hits, 0);
    }

    #[test]
    fn test_device_error_propagates() {
        let mut keyboard = FakeKeyboard::new(&[A]);
        keyboard.fail_next = true;
        let mut driver = KeyboardDriver::new(keyboard);
        let mut out: Vec<KeyChar> = Vec::new();

        let err = driver.drain(&mut out).unwrap_err();
        assert_eq!(
            err,
            DriverError::Device(KeyboardError::Transmission(0x81))
        );
        assert_eq!(driver.stats().bytes_read, 0);
        assert_eq!(driver.stats().device_errors, 1);

        // The device recovers, the decoder state was never touched.
        assert_eq!(driver.drain(&mut out).unwrap(), 1);
    }

    #[test]
    fn test_handle_scancode_without_device() {
        let mut driver = KeyboardDriver::new(FakeKeyboard::new(&[]));
        let mut out: Vec<KeyChar> = Vec::new();

        assert_eq!(driver.handle_scancode(EXTENDED_PREFIX, &mut out), None);
        assert!(driver.state().escape_pending());
        let up = driver.handle_scancode(0x48, &mut out);
        assert_eq!(up.map(|c| c.as_byte()), Some(0xE2));
        assert_eq!(out, vec![KeyChar::new(0xE2)]);
    }

    #[test]
    fn test_reset_clears_modifiers() {
        let mut driver = KeyboardDriver::new(FakeKeyboard::new(&[LEFT_SHIFT]));
        driver.drain(&mut |_: KeyChar| {}).unwrap();
        assert!(driver.state().is_shift());

        driver.reset();
        assert!(!driver.state().is_shift());
    }

    #[test]
    fn test_zero_drain_limit_is_clamped() {
        let config = KeyboardConfig {
            drain_limit: 0,
            ..KeyboardConfig::default()
        };
        let driver = KeyboardDriver::with_config(FakeKeyboard::new(&[]), &config);
        assert_eq!(driver.drain_limit(), 1);
    }
}
