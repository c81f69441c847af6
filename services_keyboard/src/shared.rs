//! Lock-protected keyboard driver
//!
//! `ScancodeDecoder` is not reentrant. When more than one context can poll
//! the keyboard (an interrupt handler and a polling thread, or several CPUs)
//! the driver is wrapped in a spin lock so only one decode runs at a time.

use hal::{KeyboardDevice, ModifierState};
use input_types::KeyChar;
use log::trace;
use spin::Mutex;

use crate::driver::{CharacterSink, DriverError, DriverStats, KeyboardDriver};

/// Keyboard driver behind a spin lock
pub struct SharedKeyboardDriver<D: KeyboardDevice> {
    inner: Mutex<KeyboardDriver<D>>,
}

impl<D: KeyboardDevice> SharedKeyboardDriver<D> {
    pub fn new(driver: KeyboardDriver<D>) -> Self {
        Self {
            inner: Mutex::new(driver),
        }
    }

    /// Drains the device, spinning until the lock is free
    pub fn drain<S: CharacterSink + ?Sized>(&self, sink: &mut S) -> Result<usize, DriverError> {
        self.inner.lock().drain(sink)
    }

    /// Drains the device unless another context holds the lock
    ///
    /// Returns `Ok(None)` when the lock is taken. Interrupt handlers use this
    /// so they never spin on a lock held by the code they interrupted; the
    /// bytes stay buffered in the controller for the holder to pick up.
    pub fn try_drain<S: CharacterSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<Option<usize>, DriverError> {
        match self.inner.try_lock() {
            Some(mut driver) => driver.drain(sink).map(Some),
            None => {
                trace!("keyboard busy, deferring drain");
                Ok(None)
            }
        }
    }

    /// Decodes a byte the caller already read
    pub fn handle_scancode<S: CharacterSink + ?Sized>(
        &self,
        raw: u8,
        sink: &mut S,
    ) -> Option<KeyChar> {
        self.inner.lock().handle_scancode(raw, sink)
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Copy of the current modifier state
    pub fn state(&self) -> ModifierState {
        *self.inner.lock().state()
    }

    pub fn stats(&self) -> DriverStats {
        self.inner.lock().stats()
    }

    /// Runs `f` with exclusive access to the driver
    pub fn with<R>(&self, f: impl FnOnce(&mut KeyboardDriver<D>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
