#![no_std]

//! # Input Types
//!
//! Shared types for the keyboard decoding pipeline.
//!
//! ## Philosophy
//!
//! - **Bytes in, characters out**: The decoder emits single-byte characters,
//!   navigation keys are encoded above the ASCII range
//! - **Explicit modifier sets**: Held modifiers and lock toggles are separate types
//! - **Allocation free**: Everything here is `Copy` and usable from interrupt context
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A layout database (US layout only, see `hal::keymap`)
//! - A key event model with press/release/repeat states

use core::fmt;

/// Momentarily held modifier keys
///
/// Bits are only set while the corresponding key is held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Shift key (either side)
    pub const SHIFT: Self = Self { bits: 1 << 0 };
    /// Control key (either side)
    pub const CTRL: Self = Self { bits: 1 << 1 };
    /// Alt key (either side)
    pub const ALT: Self = Self { bits: 1 << 2 };

    /// Creates a new modifier set with no modifiers
    pub const fn none() -> Self {
        Self::NONE
    }

    /// Returns the raw bit representation
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns a set with the bits of `other` added
    pub const fn with(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns a set with the bits of `other` removed
    pub const fn without(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Returns true if all bits of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Returns true if no modifier is held
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub const fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub const fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (flag, name) in [(Self::CTRL, "ctrl"), (Self::ALT, "alt"), (Self::SHIFT, "shift")] {
            if self.contains(flag) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Lock keys that flip on every press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LockKeys {
    bits: u8,
}

impl LockKeys {
    /// No lock active
    pub const NONE: Self = Self { bits: 0 };
    /// Caps lock
    pub const CAPS_LOCK: Self = Self { bits: 1 << 0 };
    /// Num lock
    pub const NUM_LOCK: Self = Self { bits: 1 << 1 };
    /// Scroll lock
    pub const SCROLL_LOCK: Self = Self { bits: 1 << 2 };

    pub const fn none() -> Self {
        Self::NONE
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns the set with the bits of `other` flipped
    pub const fn toggled(self, other: Self) -> Self {
        Self {
            bits: self.bits ^ other.bits,
        }
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn caps_lock(&self) -> bool {
        self.contains(Self::CAPS_LOCK)
    }

    pub const fn num_lock(&self) -> bool {
        self.contains(Self::NUM_LOCK)
    }

    pub const fn scroll_lock(&self) -> bool {
        self.contains(Self::SCROLL_LOCK)
    }
}

/// Navigation keys reachable through the 0xE0 extended prefix
///
/// Each one is delivered as a single `KeyChar` byte in the 0xE0..=0xE9 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecialKey {
    Home = 0xE0,
    End = 0xE1,
    Up = 0xE2,
    Down = 0xE3,
    Left = 0xE4,
    Right = 0xE5,
    PageUp = 0xE6,
    PageDown = 0xE7,
    Insert = 0xE8,
    Delete = 0xE9,
}

impl SpecialKey {
    /// Returns the byte this key is encoded as
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a special key byte
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0xE0 => Self::Home,
            0xE1 => Self::End,
            0xE2 => Self::Up,
            0xE3 => Self::Down,
            0xE4 => Self::Left,
            0xE5 => Self::Right,
            0xE6 => Self::PageUp,
            0xE7 => Self::PageDown,
            0xE8 => Self::Insert,
            0xE9 => Self::Delete,
            _ => return None,
        })
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Home => "Home",
            Self::End => "End",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
        };
        write!(f, "{}", name)
    }
}

/// Returns the control character produced by Ctrl + `c`
///
/// `ctrl(b'A') == 0x01`, `ctrl(b'\\') == 0x1C`.
pub const fn ctrl(c: u8) -> u8 {
    c.wrapping_sub(b'@')
}

/// A decoded keyboard character
///
/// Wraps the byte produced by a keymap lookup. Values below 0x80 are ASCII
/// (including control characters), values in 0xE0..=0xE9 are [`SpecialKey`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChar(u8);

impl KeyChar {
    /// Creates a key character from a raw byte
    pub const fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Returns the raw byte
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Returns true for printable ASCII (space through tilde)
    pub const fn is_printable(self) -> bool {
        matches!(self.0, 0x20..=0x7E)
    }

    /// Returns true for ASCII control characters
    pub const fn is_control(self) -> bool {
        self.0 < 0x20 || self.0 == 0x7F
    }

    pub const fn is_ascii_letter(self) -> bool {
        self.0.is_ascii_alphabetic()
    }

    /// Returns the same key with the letter case flipped
    ///
    /// Non-letters are returned unchanged.
    pub const fn with_inverted_case(self) -> Self {
        if self.0.is_ascii_lowercase() {
            Self(self.0.to_ascii_uppercase())
        } else if self.0.is_ascii_uppercase() {
            Self(self.0.to_ascii_lowercase())
        } else {
            self
        }
    }

    /// Returns the navigation key this byte encodes, if any
    pub const fn special(self) -> Option<SpecialKey> {
        SpecialKey::from_code(self.0)
    }

    /// Returns the value as a `char` when it is ASCII
    pub fn to_char(self) -> Option<char> {
        self.0.is_ascii().then(|| self.0 as char)
    }
}

impl From<SpecialKey> for KeyChar {
    fn from(key: SpecialKey) -> Self {
        Self(key.code())
    }
}

impl From<KeyChar> for u8 {
    fn from(c: KeyChar) -> Self {
        c.0
    }
}

impl fmt::Display for KeyChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = self.special() {
            write!(f, "<{}>", key)
        } else if self.is_printable() {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "\\x{:02x}", self.0)
        }
    }
}
