// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! I/O Device Trait
//!
//! Memory-mapped peripherals implement `IODevice` so they can be registered
//! with the [`Bus`](super::Bus) without the bus knowing each device type.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Memory Bus                     │
//! ├─────────────────────────────────────────────┤
//! │  Devices: Vec<Box<dyn IODevice>>            │
//! │                                             │
//! │  read32(addr) {                             │
//! │    device = find(addr)                      │
//! │    device.read_register(addr - start)       │
//! │  }                                          │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!                      │
//!              ┌───────┴────────┐
//!              │ FmaAccelerator │
//!              │  (IODevice)    │
//!              └────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use fmatest::core::memory::IODevice;
//! use fmatest::core::error::Result;
//!
//! struct Scratch {
//!     base_addr: u64,
//!     registers: [u32; 4],
//! }
//!
//! impl IODevice for Scratch {
//!     fn address_range(&self) -> (u64, u64) {
//!         (self.base_addr, self.base_addr + 0x0F)
//!     }
//!
//!     fn read_register(&mut self, offset: u64) -> Result<u32> {
//!         Ok(self.registers[(offset / 4) as usize])
//!     }
//!
//!     fn write_register(&mut self, offset: u64, value: u32) -> Result<()> {
//!         self.registers[(offset / 4) as usize] = value;
//!         Ok(())
//!     }
//! }
//! ```

use std::any::Any;

use crate::core::error::Result;

/// Trait for memory-mapped I/O devices
///
/// Devices only expose 32-bit register access. The Bus checks alignment and
/// range before calling into a device, so implementations receive 4-byte
/// aligned offsets that fall inside their own `address_range`.
///
/// Reads take `&mut self`: hardware status registers commonly change state
/// when read (the FMA busy flag counts down on each poll).
///
/// The `Any` supertrait lets the Bus hand back a concrete device for
/// inspection with [`Bus::device`](super::Bus::device).
pub trait IODevice: Any {
    /// Address range this device responds to, `(start, end)` inclusive
    fn address_range(&self) -> (u64, u64);

    /// Check if this device contains the given address
    fn contains(&self, addr: u64) -> bool {
        let (start, end) = self.address_range();
        addr >= start && addr <= end
    }

    /// Read a 32-bit register
    ///
    /// `offset` is relative to the start of `address_range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset does not name a readable register.
    fn read_register(&mut self, offset: u64) -> Result<u32>;

    /// Write a 32-bit register
    ///
    /// # Errors
    ///
    /// Returns an error if the offset does not name a writable register.
    fn write_register(&mut self, offset: u64, value: u32) -> Result<()>;

    /// Device name for logging
    fn name(&self) -> &str {
        "Unknown Device"
    }
}
