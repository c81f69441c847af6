//! Scancode to character decoding
//!
//! This module turns the raw byte stream of a PS/2 keyboard into characters.
//!
//! ## Philosophy
//!
//! - **One byte in, at most one character out**: `decode` is synchronous
//! - **Infallible**: Every byte is valid input; nonsense degrades to `None`
//! - **Interrupt safe**: No allocation, no I/O, constant time
//!
//! ## Scan Code Set
//!
//! This implementation assumes **PS/2 Scan Code Set 1**.
//! - Released keys have bit 7 set (scancode | 0x80)
//! - Extended keys are prefixed with 0xE0; the decoder folds the prefix into
//!   bit 7 of the following make code to index the extended half of the tables
//!
//! ## Concurrency
//!
//! `ScancodeDecoder` is not reentrant. Its owner must guarantee one `decode`
//! at a time and must feed bytes in the order the hardware produced them.

use input_types::{KeyChar, LockKeys, Modifiers};

use crate::keyboard::ScancodeEvent;
use crate::keymap::{self, KeymapBank, NO, US_KEYMAP};

/// Modifier tracking state
///
/// Held modifiers, lock toggles and the pending extended prefix.
/// The zero value is the state of a freshly initialized keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    momentary: Modifiers,
    toggled: LockKeys,
    escape_pending: bool,
}

impl ModifierState {
    /// Creates a new modifier state (all released, all locks off)
    pub fn new() -> Self {
        Self::default()
    }

    /// Held modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.momentary
    }

    /// Active lock keys
    pub fn locks(&self) -> LockKeys {
        self.toggled
    }

    /// True between an 0xE0 prefix and the byte that follows it
    pub fn escape_pending(&self) -> bool {
        self.escape_pending
    }

    pub fn is_shift(&self) -> bool {
        self.momentary.is_shift()
    }

    pub fn is_ctrl(&self) -> bool {
        self.momentary.is_ctrl()
    }

    pub fn is_alt(&self) -> bool {
        self.momentary.is_alt()
    }

    pub fn caps_lock(&self) -> bool {
        self.toggled.caps_lock()
    }

    /// Keymap table index from the {CTRL, SHIFT} pair
    ///
    /// Bit 1 is ctrl, bit 0 is shift.
    pub fn table_index(&self) -> usize {
        let mut index = KeymapBank::PLAIN;
        if self.is_shift() {
            index |= KeymapBank::SHIFTED;
        }
        if self.is_ctrl() {
            index |= KeymapBank::CONTROL;
        }
        index
    }

    fn press(&mut self, code: u8) {
        self.momentary = self.momentary.with(keymap::shift_code(code));
        self.toggled = self.toggled.toggled(keymap::toggle_code(code));
    }

    fn release(&mut self, code: u8) {
        self.momentary = self.momentary.without(keymap::shift_code(code));
    }
}

/// Scancode decoder
///
/// Owns a [`ModifierState`] and translates one scan code byte per call.
#[derive(Debug, Clone)]
pub struct ScancodeDecoder {
    state: ModifierState,
    keymap: &'static KeymapBank,
}

impl ScancodeDecoder {
    /// Creates a decoder using the US keymap
    pub fn new() -> Self {
        Self::with_keymap(&US_KEYMAP)
    }

    /// Creates a decoder over a specific keymap bank
    pub fn with_keymap(keymap: &'static KeymapBank) -> Self {
        Self {
            state: ModifierState::new(),
            keymap,
        }
    }

    /// Decodes one raw scan code byte
    ///
    /// Returns `Some` only for key presses that map to a character. Prefix
    /// bytes, releases and modifier presses return `None`.
    pub fn decode(&mut self, raw: u8) -> Option<KeyChar> {
        let event = ScancodeEvent::classify(raw, self.state.escape_pending);

        if event.is_prefix() {
            self.state.escape_pending = true;
            return None;
        }

        self.state.escape_pending = false;
        let code = event.lookup_code();

        if event.release {
            self.state.release(code);
            return None;
        }

        self.state.press(code);

        let byte = self.keymap.lookup(self.state.table_index(), code);
        if byte == NO {
            return None;
        }

        let c = KeyChar::new(byte);
        if self.state.caps_lock() {
            Some(c.with_inverted_case())
        } else {
            Some(c)
        }
    }

    /// Current modifier state
    pub fn state(&self) -> &ModifierState {
        &self.state
    }

    /// Resets the decoder (all modifiers released, locks off, no pending prefix)
    pub fn reset(&mut self) {
        self.state = ModifierState::new();
    }
}

impl Default for ScancodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
