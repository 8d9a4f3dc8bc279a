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

//! FMA smoke test driver
//!
//! Runs one operation on the accelerator and reports what the hardware
//! produced:
//!
//! ```text
//!  LOAD    write A, B, C
//!   │
//!  WAIT    read BUSY until it is zero   (unbounded spin)
//!   │
//!  REPORT  read RESULT once, print "Result: 0x<hex>"
//! ```
//!
//! The driver never checks the result. If the busy flag never clears it
//! spins forever.
//!
//! # Example
//!
//! ```
//! use fmatest::core::driver::SmokeTest;
//! use fmatest::core::fma::{Completion, FmaAccelerator};
//! use fmatest::core::memory::Bus;
//! use fmatest::core::mmio::BusRegisters;
//!
//! let mut bus = Bus::new();
//! bus.register_device(Box::new(FmaAccelerator::new(0x10000, Completion::Immediate)));
//!
//! let mut test = SmokeTest::with_default_operands(BusRegisters::new(bus, 0x10000));
//! let outcome = test.run();
//!
//! assert_eq!(outcome.result, 0x41200000);
//! ```

use std::io::{self, Write};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::fma::registers;
use crate::core::mmio::RegisterFile;

/// Operand bit patterns written during LOAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operands {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Operands {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Build from single-precision values
    pub fn from_f32(a: f32, b: f32, c: f32) -> Self {
        Self::new(a.to_bits(), b.to_bits(), c.to_bits())
    }
}

impl Default for Operands {
    /// 2.0, 3.0 and 4.0
    fn default() -> Self {
        Self::new(0x40000000, 0x40400000, 0x40800000)
    }
}

/// Driver phase, for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Load,
    Wait,
    Report,
}

/// What a completed run observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Raw result register value
    pub result: u32,
    /// Busy register reads, including the final one that read zero
    pub busy_polls: u64,
}

/// Format a result the way the smoke test prints it
pub fn format_result(result: u32) -> String {
    format!("Result: 0x{:x}", result)
}

/// LOAD → WAIT → REPORT driver over a register file
pub struct SmokeTest<R: RegisterFile> {
    regs: R,
    operands: Operands,
}

impl<R: RegisterFile> SmokeTest<R> {
    pub fn new(regs: R, operands: Operands) -> Self {
        Self { regs, operands }
    }

    /// Driver with operands 2.0, 3.0 and 4.0
    pub fn with_default_operands(regs: R) -> Self {
        Self::new(regs, Operands::default())
    }

    pub fn operands(&self) -> Operands {
        self.operands
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Give back the register file, e.g. to inspect a simulated bus
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Run all three phases and return what was observed
    ///
    /// Blocks until the busy flag reads zero. There is no timeout.
    pub fn run(&mut self) -> Outcome {
        self.load();
        let busy_polls = self.wait();
        let result = self.report();

        Outcome { result, busy_polls }
    }

    /// Run, then write the single report line to `out`
    ///
    /// # Errors
    ///
    /// Only errors from writing to `out`.
    pub fn run_and_report<W: Write>(&mut self, mut out: W) -> io::Result<Outcome> {
        let outcome = self.run();
        writeln!(out, "{}", format_result(outcome.result))?;
        out.flush()?;
        Ok(outcome)
    }

    fn load(&mut self) {
        debug!("{:?}: {:08X?}", Phase::Load, self.operands);

        self.regs.write(registers::OPERAND_A, self.operands.a);
        self.regs.write(registers::OPERAND_B, self.operands.b);
        self.regs.write(registers::OPERAND_C, self.operands.c);
    }

    fn wait(&mut self) -> u64 {
        debug!("{:?}: polling busy flag", Phase::Wait);

        let mut polls = 1;
        while self.regs.read(registers::BUSY) != 0 {
            polls += 1;
            std::hint::spin_loop();
        }

        trace!("{:?}: busy cleared after {} polls", Phase::Wait, polls);
        polls
    }

    fn report(&mut self) -> u32 {
        let result = self.regs.read(registers::RESULT);
        debug!("{:?}: result=0x{:08X}", Phase::Report, result);
        result
    }
}
