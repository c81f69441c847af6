//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the keyboard device trait and the scancode decoder
//! that sits directly on top of it.
//!
//! ## Philosophy
//!
//! **Architecture must be fully abstracted and swappable.**
//!
//! Port I/O and controller details live in architecture crates. This crate
//! only sees bytes.
//!
//! ## Design Principles
//!
//! 1. **No x86-specific assumptions**: Decoding works on any byte source
//! 2. **Trait-based**: Hardware access goes through `KeyboardDevice`
//! 3. **Static tables**: Keymaps are immutable data, indexed not dispatched
//! 4. **Testable**: Devices can be mocked for testing

pub mod keyboard;
pub mod keyboard_translation;
pub mod keymap;

pub use keyboard::{KeyboardDevice, KeyboardError, ScancodeEvent};
pub use keyboard_translation::{ModifierState, ScancodeDecoder};
pub use keymap::{KeymapBank, US_KEYMAP};
