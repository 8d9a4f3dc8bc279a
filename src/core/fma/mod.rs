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

//! Simulated FMA Accelerator
//!
//! Software model of the memory-mapped fused-multiply-add peripheral. It
//! computes `a * b + c` on single-precision operands with one rounding step.
//!
//! ## Operation Cycle
//!
//! ```text
//!   write A ─┐
//!   write B ─┼─> all three latched ─> start ─> BUSY != 0 ─> ... ─> BUSY == 0
//!   write C ─┘    (any order)                  (per Completion)     RESULT valid
//! ```
//!
//! An operation starts once all three operands have been written since the
//! previous start. Each operand write only latches its value; pending
//! operands are tracked in [`PendingOperands`].
//!
//! ## Busy Flag
//!
//! How long the busy flag stays set is controlled by [`Completion`]. The
//! flag drops once per operation. While it is set, the result register still
//! holds the previous result, so a driver that reads it early sees a stale
//! value. Such reads are counted in [`FmaAccelerator::premature_result_reads`].

pub mod registers;

use bitflags::bitflags;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::error::{FmaError, Result};
use crate::core::memory::IODevice;
use registers::{Direction, Register};

bitflags! {
    /// Operands latched since the last operation started
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PendingOperands: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const C = 1 << 2;
    }
}

bitflags! {
    /// Busy/status register value
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u32 {
        const BUSY = 1 << 0;
    }
}

/// When the busy flag clears after an operation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Result is ready as soon as the last operand lands
    Immediate,
    /// The next `n` busy reads return non-zero, then the flag clears
    AfterPolls(u32),
    /// The flag never clears (wedged hardware)
    Never,
}

impl Default for Completion {
    fn default() -> Self {
        Completion::AfterPolls(1)
    }
}

/// Operation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Computing; `polls_left` is `None` when the flag never clears
    Busy { polls_left: Option<u32>, result: u32 },
}

/// Compute `a * b + c` on raw IEEE-754 single-precision bit patterns
///
/// # Example
///
/// ```
/// use fmatest::core::fma::fused_multiply_add;
///
/// // 2.0 * 3.0 + 4.0 = 10.0
/// assert_eq!(fused_multiply_add(0x40000000, 0x40400000, 0x40800000), 0x41200000);
/// ```
pub fn fused_multiply_add(a: u32, b: u32, c: u32) -> u32 {
    f32::from_bits(a)
        .mul_add(f32::from_bits(b), f32::from_bits(c))
        .to_bits()
}

/// Simulated FMA peripheral
#[derive(Debug, Clone)]
pub struct FmaAccelerator {
    base: u64,
    completion: Completion,

    operand_a: u32,
    operand_b: u32,
    operand_c: u32,

    /// Result of the last completed operation
    result: u32,

    pending: PendingOperands,
    state: State,

    operations_completed: u64,
    busy_reads: u64,
    premature_result_reads: u64,
}

impl FmaAccelerator {
    /// Create an idle accelerator mapped at `base`
    pub fn new(base: u64, completion: Completion) -> Self {
        Self {
            base,
            completion,
            operand_a: 0,
            operand_b: 0,
            operand_c: 0,
            result: 0,
            pending: PendingOperands::empty(),
            state: State::Idle,
            operations_completed: 0,
            busy_reads: 0,
            premature_result_reads: 0,
        }
    }

    /// Return to power-on state, keeping base address and completion mode
    pub fn reset(&mut self) {
        *self = Self::new(self.base, self.completion);
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn set_completion(&mut self, completion: Completion) {
        self.completion = completion;
    }

    /// Whether an operation is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.state, State::Busy { .. })
    }

    pub fn pending(&self) -> PendingOperands {
        self.pending
    }

    /// Latched operand values `(a, b, c)`
    pub fn operands(&self) -> (u32, u32, u32) {
        (self.operand_a, self.operand_b, self.operand_c)
    }

    /// Result register contents
    pub fn result(&self) -> u32 {
        self.result
    }

    pub fn operations_completed(&self) -> u64 {
        self.operations_completed
    }

    /// Number of busy register reads
    pub fn busy_reads(&self) -> u64 {
        self.busy_reads
    }

    /// Number of result reads made while an operation was in flight
    pub fn premature_result_reads(&self) -> u64 {
        self.premature_result_reads
    }

    fn latch(&mut self, register: Register, value: u32) {
        match register {
            Register::OperandA => {
                self.operand_a = value;
                self.pending |= PendingOperands::A;
            }
            Register::OperandB => {
                self.operand_b = value;
                self.pending |= PendingOperands::B;
            }
            Register::OperandC => {
                self.operand_c = value;
                self.pending |= PendingOperands::C;
            }
            // Read-only registers are rejected before latching
            Register::Result | Register::Busy => return,
        }

        if self.pending.is_all() {
            self.start();
        }
    }

    fn start(&mut self) {
        self.pending = PendingOperands::empty();
        let result = fused_multiply_add(self.operand_a, self.operand_b, self.operand_c);

        debug!(
            "FMA: start a=0x{:08X} b=0x{:08X} c=0x{:08X} ({:?})",
            self.operand_a, self.operand_b, self.operand_c, self.completion
        );

        match self.completion {
            Completion::Immediate | Completion::AfterPolls(0) => self.finish(result),
            Completion::AfterPolls(n) => {
                self.state = State::Busy {
                    polls_left: Some(n),
                    result,
                }
            }
            Completion::Never => {
                self.state = State::Busy {
                    polls_left: None,
                    result,
                }
            }
        }
    }

    fn finish(&mut self, result: u32) {
        self.result = result;
        self.state = State::Idle;
        self.operations_completed += 1;
        debug!("FMA: done result=0x{:08X}", result);
    }

    fn read_busy(&mut self) -> u32 {
        self.busy_reads += 1;

        match self.state {
            State::Idle => Status::empty().bits(),
            State::Busy {
                polls_left: Some(0),
                result,
            } => {
                self.finish(result);
                Status::empty().bits()
            }
            State::Busy {
                polls_left: Some(n),
                result,
            } => {
                self.state = State::Busy {
                    polls_left: Some(n - 1),
                    result,
                };
                Status::BUSY.bits()
            }
            State::Busy {
                polls_left: None, ..
            } => Status::BUSY.bits(),
        }
    }

    fn read_result(&mut self) -> u32 {
        if self.is_busy() {
            self.premature_result_reads += 1;
            trace!("FMA: result read while busy, returning stale value");
        }
        self.result
    }
}

impl IODevice for FmaAccelerator {
    fn address_range(&self) -> (u64, u64) {
        (self.base, self.base + (registers::WINDOW_SIZE - 1))
    }

    fn read_register(&mut self, offset: u64) -> Result<u32> {
        let register = Register::from_offset(offset).ok_or(FmaError::InvalidMemoryAccess {
            address: self.base.wrapping_add(offset),
        })?;

        match register {
            Register::Busy => Ok(self.read_busy()),
            Register::Result => Ok(self.read_result()),
            _ => Err(FmaError::WriteOnlyRegister { offset }),
        }
    }

    fn write_register(&mut self, offset: u64, value: u32) -> Result<()> {
        let register = Register::from_offset(offset).ok_or(FmaError::InvalidMemoryAccess {
            address: self.base.wrapping_add(offset),
        })?;

        if register.direction() == Direction::Read {
            return Err(FmaError::ReadOnlyRegister { offset });
        }

        trace!("FMA: {} <- 0x{:08X}", register.name(), value);
        self.latch(register, value);
        Ok(())
    }

    fn name(&self) -> &str {
        "FMA Accelerator"
    }
}

#[cfg(test)]
mod tests;
