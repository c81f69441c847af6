//! # x86_64 Hardware Abstraction Layer
//!
//! This crate implements the HAL keyboard device for x86_64: port I/O and
//! the i8042 PS/2 controller.

pub mod config;
pub mod keyboard;
pub mod port_io;

pub use config::{ConfigError, Ps2Config};
pub use keyboard::X86Ps2Keyboard;
pub use port_io::{FakePortIo, PortIo, RealPortIo};
