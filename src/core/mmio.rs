// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Register access
//!
//! Two layers:
//!
//! - [`write_register`] / [`read_register`]: raw volatile 32-bit accesses at
//!   absolute addresses. Every call is a real load or store of exactly four
//!   bytes, emitted in program order and never merged, elided or cached.
//! - [`RegisterFile`]: the capability the driver is written against. Offsets
//!   are relative to the accelerator base. [`VolatileRegisters`] backs it with
//!   the raw accessors; [`BusRegisters`] backs it with a simulated [`Bus`].

use log::error;

use crate::core::memory::Bus;

/// Write a 32-bit value to a memory-mapped register
///
/// # Safety
///
/// `address` must be a 4-byte aligned address of a device register (or
/// memory) that is mapped writable in the current address space.
#[inline]
pub unsafe fn write_register(address: usize, value: u32) {
    // SAFETY: upheld by the caller
    unsafe { core::ptr::write_volatile(address as *mut u32, value) }
}

/// Read a 32-bit value from a memory-mapped register
///
/// # Safety
///
/// `address` must be a 4-byte aligned address of a device register (or
/// memory) that is mapped readable in the current address space.
#[inline]
pub unsafe fn read_register(address: usize) -> u32 {
    // SAFETY: upheld by the caller
    unsafe { core::ptr::read_volatile(address as *const u32) }
}

/// Register file of one accelerator, addressed by offset from its base
///
/// Accesses have no error channel: on hardware a bad access is undefined by
/// platform contract, and a simulation records faults on its own side.
pub trait RegisterFile {
    /// Read the 32-bit register at `offset`
    fn read(&mut self, offset: u64) -> u32;

    /// Write the 32-bit register at `offset`
    fn write(&mut self, offset: u64, value: u32);
}

impl<R: RegisterFile + ?Sized> RegisterFile for &mut R {
    fn read(&mut self, offset: u64) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u64, value: u32) {
        (**self).write(offset, value);
    }
}

/// Register file backed by volatile accesses to a fixed base address
///
/// For bare-metal targets, or any environment where the accelerator window
/// is already mapped at `base` in this process.
#[derive(Debug)]
pub struct VolatileRegisters {
    base: usize,
}

impl VolatileRegisters {
    /// # Safety
    ///
    /// The whole register window starting at `base` must be mapped and
    /// backed by the accelerator (or memory) for the lifetime of the value,
    /// and `base` must be 4-byte aligned.
    pub unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }
}

impl RegisterFile for VolatileRegisters {
    #[inline]
    fn read(&mut self, offset: u64) -> u32 {
        // SAFETY: the window is mapped, guaranteed by `new`'s caller
        unsafe { read_register(self.base + offset as usize) }
    }

    #[inline]
    fn write(&mut self, offset: u64, value: u32) {
        // SAFETY: the window is mapped, guaranteed by `new`'s caller
        unsafe { write_register(self.base + offset as usize, value) }
    }
}

/// Register file backed by a simulated [`Bus`]
///
/// Offsets are translated to absolute addresses by adding `base`. A faulting
/// access is logged and left on the bus's fault log; a faulting read returns
/// open-bus `0`.
pub struct BusRegisters {
    bus: Bus,
    base: u64,
}

impl BusRegisters {
    /// Value returned by a read the bus rejects
    pub const OPEN_BUS: u32 = 0;

    pub fn new(bus: Bus, base: u64) -> Self {
        Self { bus, base }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn into_bus(self) -> Bus {
        self.bus
    }

    fn address(&self, offset: u64) -> u64 {
        self.base.wrapping_add(offset)
    }
}

impl RegisterFile for BusRegisters {
    fn read(&mut self, offset: u64) -> u32 {
        let address = self.address(offset);
        self.bus.read32(address).unwrap_or_else(|e| {
            error!("Register read at 0x{:08X} failed: {}", address, e);
            Self::OPEN_BUS
        })
    }

    fn write(&mut self, offset: u64, value: u32) {
        let address = self.address(offset);
        if let Err(e) = self.bus.write32(address, value) {
            error!("Register write at 0x{:08X} failed: {}", address, e);
        }
    }
}
