//! Port I/O abstraction for x86_64
//!
//! Keyboard controller access goes through the `PortIo` trait so the PS/2
//! device can run against real ports or a scripted fake.
//!
//! ## Safety
//!
//! Port I/O talks to hardware directly. All unsafe code is confined to
//! `RealPortIo::inb`. The keyboard path only ever reads; nothing here writes
//! to the controller.

use std::collections::VecDeque;

/// Port I/O trait
///
/// Implementations must complete each access synchronously before returning.
pub trait PortIo {
    /// Reads a byte from an I/O port
    fn inb(&mut self, port: u16) -> u8;
}

/// Real hardware port I/O using `in`
///
/// Only sound in ring 0 on x86, on ports that belong to the caller.
///
/// ## Example
///
/// ```rust,ignore
/// let mut io = RealPortIo::new();
/// let status = io.inb(0x64); // PS/2 status register
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RealPortIo;

impl RealPortIo {
    /// Creates a new real port I/O handle
    pub fn new() -> Self {
        Self
    }
}

impl PortIo for RealPortIo {
    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        let value: u8;
        // SAFETY: the caller runs with I/O privilege and owns `port`.
        // `in al, dx` touches neither memory nor the stack.
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }
}

/// One expected `inb` call and the value it returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedRead {
    pub port: u16,
    pub value: u8,
}

/// Fake port I/O for tests
///
/// Reads are served from an ordered script; a read from the wrong port, or
/// past the end of the script, panics.
///
/// ## Example
///
/// ```rust
/// use hal_x86_64::port_io::{FakePortIo, PortIo};
///
/// let mut io = FakePortIo::new();
/// io.script_read(0x64, 0x01); // Status: data available
/// io.script_read(0x60, 0x1E); // Data: scancode 0x1E
///
/// assert_eq!(io.inb(0x64), 0x01);
/// assert_eq!(io.inb(0x60), 0x1E);
/// assert_eq!(io.remaining_reads(), 0);
/// ```
#[derive(Debug, Default)]
pub struct FakePortIo {
    script: VecDeque<ScriptedRead>,
    consumed: usize,
}

impl FakePortIo {
    /// Creates an empty fake
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one read to the script
    pub fn script_read(&mut self, port: u16, value: u8) {
        self.script.push_back(ScriptedRead { port, value });
    }

    /// Scripts a keyboard controller delivering `bytes`
    ///
    /// Each byte is one status read reporting `ready_mask` followed by one
    /// data read. A final status read of zero reports the buffer empty.
    pub fn script_scancodes(
        &mut self,
        status_port: u16,
        data_port: u16,
        ready_mask: u8,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            self.script_read(status_port, ready_mask);
            self.script_read(data_port, byte);
        }
        self.script_read(status_port, 0);
    }

    /// Number of scripted reads not yet consumed
    pub fn remaining_reads(&self) -> usize {
        self.script.len()
    }
}

impl PortIo for FakePortIo {
    fn inb(&mut self, port: u16) -> u8 {
        let Some(next) = self.script.pop_front() else {
            panic!(
                "FakePortIo: No scripted read for port 0x{:04X} after {} reads",
                port, self.consumed
            );
        };
        if next.port != port {
            panic!(
                "FakePortIo: Port mismatch at read {}: expected 0x{:04X}, got 0x{:04X}",
                self.consumed, next.port, port
            );
        }
        self.consumed += 1;
        next.value
    }
}
