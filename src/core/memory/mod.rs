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

//! Simulated memory bus
//!
//! The Bus stands in for the physical address space on hosted runs. It routes
//! 32-bit accesses at absolute addresses to registered [`IODevice`]s and
//! enforces the same contract real MMIO has: every access is exactly 4 bytes,
//! 4-byte aligned, and lands inside a device window.
//!
//! On top of routing, the Bus can audit what a driver did:
//!
//! - an optional access trace, in program order
//! - a fault log of every access that was rejected
//!
//! # Example
//!
//! ```
//! use fmatest::core::fma::{Completion, FmaAccelerator};
//! use fmatest::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//! bus.register_device(Box::new(FmaAccelerator::new(0x10000, Completion::Immediate)));
//!
//! bus.write32(0x10000, 0x40000000).unwrap();
//! assert_eq!(bus.read32(0x10010).unwrap(), 0);
//!
//! // Nothing is mapped below the accelerator
//! assert!(bus.read32(0x0000).is_err());
//! assert_eq!(bus.faults().len(), 1);
//! ```

mod io_device;

pub use io_device::IODevice;

use std::any::Any;

use log::{debug, trace, warn};

use crate::core::error::{FmaError, Result};

/// Kind of bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One completed 32-bit access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    /// Absolute address
    pub address: u64,
    /// Value written, or value returned by the read
    pub value: u32,
}

/// A rejected access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFault {
    pub kind: AccessKind,
    pub address: u64,
    /// Rendered error message
    pub reason: String,
}

/// Memory bus routing 32-bit accesses to devices
pub struct Bus {
    devices: Vec<Box<dyn IODevice>>,

    /// Access trace, `None` while tracing is disabled
    trace: Option<Vec<Access>>,

    faults: Vec<BusFault>,
}

impl Bus {
    /// Width of every bus access in bytes
    pub const ACCESS_SIZE: u8 = 4;

    /// Create an empty bus with tracing disabled
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            trace: None,
            faults: Vec::new(),
        }
    }

    /// Attach a device
    ///
    /// Devices are searched in registration order, so the first device whose
    /// window contains an address wins.
    pub fn register_device(&mut self, device: Box<dyn IODevice>) {
        let (start, end) = device.address_range();
        debug!(
            "Bus: mapped {} at 0x{:08X}-0x{:08X}",
            device.name(),
            start,
            end
        );
        self.devices.push(device);
    }

    /// Borrow the first registered device of type `T`
    pub fn device<T: IODevice>(&self) -> Option<&T> {
        self.devices.iter().find_map(|device| {
            let device: &dyn IODevice = &**device;
            let any: &dyn Any = device;
            any.downcast_ref::<T>()
        })
    }

    /// Mutably borrow the first registered device of type `T`
    pub fn device_mut<T: IODevice>(&mut self) -> Option<&mut T> {
        self.devices.iter_mut().find_map(|device| {
            let device: &mut dyn IODevice = &mut **device;
            let any: &mut dyn Any = device;
            any.downcast_mut::<T>()
        })
    }

    /// Start recording accesses, discarding any previous trace
    pub fn enable_trace(&mut self) {
        self.trace = Some(Vec::new());
    }

    /// Stop recording accesses
    pub fn disable_trace(&mut self) {
        self.trace = None;
    }

    /// Accesses recorded since tracing was enabled
    pub fn trace(&self) -> &[Access] {
        self.trace.as_deref().unwrap_or(&[])
    }

    pub fn clear_trace(&mut self) {
        if let Some(trace) = self.trace.as_mut() {
            trace.clear();
        }
    }

    /// Every access rejected so far
    pub fn faults(&self) -> &[BusFault] {
        &self.faults
    }

    /// Read a 32-bit word
    ///
    /// # Errors
    ///
    /// - [`FmaError::UnalignedAccess`] if `addr` is not 4-byte aligned
    /// - [`FmaError::InvalidMemoryAccess`] if no device maps `addr`
    /// - any error the device reports for the register
    pub fn read32(&mut self, addr: u64) -> Result<u32> {
        match self.route_read(addr) {
            Ok(value) => {
                trace!("Bus: read32 0x{:08X} -> 0x{:08X}", addr, value);
                self.record(AccessKind::Read, addr, value);
                Ok(value)
            }
            Err(e) => {
                self.record_fault(AccessKind::Read, addr, &e);
                Err(e)
            }
        }
    }

    /// Write a 32-bit word
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bus::read32`].
    pub fn write32(&mut self, addr: u64, value: u32) -> Result<()> {
        match self.route_write(addr, value) {
            Ok(()) => {
                trace!("Bus: write32 0x{:08X} <- 0x{:08X}", addr, value);
                self.record(AccessKind::Write, addr, value);
                Ok(())
            }
            Err(e) => {
                self.record_fault(AccessKind::Write, addr, &e);
                Err(e)
            }
        }
    }

    fn route_read(&mut self, addr: u64) -> Result<u32> {
        let (device, offset) = self.find_device(addr)?;
        device.read_register(offset)
    }

    fn route_write(&mut self, addr: u64, value: u32) -> Result<()> {
        let (device, offset) = self.find_device(addr)?;
        device.write_register(offset, value)
    }

    /// Locate the device mapping `addr` and translate to a device offset
    fn find_device(&mut self, addr: u64) -> Result<(&mut Box<dyn IODevice>, u64)> {
        if addr % u64::from(Self::ACCESS_SIZE) != 0 {
            return Err(FmaError::UnalignedAccess {
                address: addr,
                size: Self::ACCESS_SIZE,
            });
        }

        // The whole word must sit inside the window, not just its first byte
        let last = addr
            .checked_add(u64::from(Self::ACCESS_SIZE) - 1)
            .ok_or(FmaError::InvalidMemoryAccess { address: addr })?;

        self.devices
            .iter_mut()
            .find(|device| device.contains(addr) && device.contains(last))
            .map(|device| {
                let (start, _) = device.address_range();
                (device, addr - start)
            })
            .ok_or(FmaError::InvalidMemoryAccess { address: addr })
    }

    fn record(&mut self, kind: AccessKind, address: u64, value: u32) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(Access {
                kind,
                address,
                value,
            });
        }
    }

    fn record_fault(&mut self, kind: AccessKind, address: u64, error: &FmaError) {
        warn!("Bus: {:?} fault at 0x{:08X}: {}", kind, address, error);
        self.faults.push(BusFault {
            kind,
            address,
            reason: error.to_string(),
        });
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
