//! # Keyboard Service
//!
//! Connects a hardware keyboard to whatever consumes characters (console,
//! line editor, shell).
//!
//! ## Philosophy
//!
//! - **Hardware is just a source**: The device hands out bytes, nothing more
//! - **Explicit state**: Modifier state lives in the driver, never in a global
//! - **Push delivery**: Each produced character goes to a `CharacterSink`
//! - **Bounded work**: A drain never consumes more than its configured limit
//!
//! ## Design
//!
//! For every buffered byte the driver:
//! - Reads it via `KeyboardDevice::poll_scancode`
//! - Decodes it via `hal::ScancodeDecoder`
//! - Calls `CharacterSink::on_character` if a character came out
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hal_x86_64::{RealPortIo, X86Ps2Keyboard};
//! use services_keyboard::{KeyboardConfig, KeyboardDriver, SharedKeyboardDriver};
//!
//! let config = KeyboardConfig::from_json(CONFIG_JSON)?;
//! let keyboard = X86Ps2Keyboard::with_config(RealPortIo::new(), config.ps2);
//! let driver = SharedKeyboardDriver::new(KeyboardDriver::with_config(keyboard, &config));
//!
//! // IRQ 1
//! fn keyboard_interrupt() {
//!     let _ = driver.try_drain(&mut console);
//! }
//! ```

pub mod config;
pub mod driver;
pub mod shared;

pub use config::{ConfigError, KeyboardConfig, CONFIG_VERSION, DEFAULT_DRAIN_LIMIT};
pub use driver::{CharacterSink, DriverError, DriverStats, KeyboardDriver, PollResult};
pub use shared::SharedKeyboardDriver;

use hal_x86_64::{PortIo, X86Ps2Keyboard};

/// Driver for an i8042 PS/2 keyboard
pub type Ps2KeyboardDriver<P> = KeyboardDriver<X86Ps2Keyboard<P>>;

/// Builds a PS/2 keyboard driver from a validated configuration
pub fn ps2_driver<P: PortIo>(
    io: P,
    config: &KeyboardConfig,
) -> Result<Ps2KeyboardDriver<P>, ConfigError> {
    config.validate()?;
    let keyboard = X86Ps2Keyboard::with_config(io, config.ps2);
    Ok(KeyboardDriver::with_config(keyboard, config))
}
