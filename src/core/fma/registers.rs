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

//! FMA accelerator register map
//!
//! ```text
//! Offset  Name        Direction  Width
//! +0x00   Operand A   W          32
//! +0x04   Operand B   W          32
//! +0x08   Operand C   W          32
//! +0x0C   Result      R          32
//! +0x10   Busy        R          32 (nonzero = busy)
//! ```
//!
//! Offsets are fixed by the hardware. The base address is not; it is
//! injected by whoever constructs the register file.

/// Default base address of the accelerator window
pub const DEFAULT_BASE_ADDR: u64 = 0x10000;

/// Operand A (multiplicand)
pub const OPERAND_A: u64 = 0x00;

/// Operand B (multiplier)
pub const OPERAND_B: u64 = 0x04;

/// Operand C (addend)
pub const OPERAND_C: u64 = 0x08;

/// Result of the last completed operation
pub const RESULT: u64 = 0x0C;

/// Busy/status flag
pub const BUSY: u64 = 0x10;

/// Size in bytes of the register window
pub const WINDOW_SIZE: u64 = 0x14;

/// Register access direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written by the driver, never read back
    Write,
    /// Read by the driver, owned by the hardware
    Read,
}

/// One of the five accelerator registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    OperandA,
    OperandB,
    OperandC,
    Result,
    Busy,
}

impl Register {
    /// All registers in address order
    pub const ALL: [Register; 5] = [
        Register::OperandA,
        Register::OperandB,
        Register::OperandC,
        Register::Result,
        Register::Busy,
    ];

    /// Decode a window-relative offset
    ///
    /// Returns `None` for offsets outside the window or not on a register
    /// boundary.
    pub fn from_offset(offset: u64) -> Option<Self> {
        match offset {
            OPERAND_A => Some(Register::OperandA),
            OPERAND_B => Some(Register::OperandB),
            OPERAND_C => Some(Register::OperandC),
            RESULT => Some(Register::Result),
            BUSY => Some(Register::Busy),
            _ => None,
        }
    }

    /// Window-relative offset of this register
    pub fn offset(self) -> u64 {
        match self {
            Register::OperandA => OPERAND_A,
            Register::OperandB => OPERAND_B,
            Register::OperandC => OPERAND_C,
            Register::Result => RESULT,
            Register::Busy => BUSY,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Register::OperandA | Register::OperandB | Register::OperandC => Direction::Write,
            Register::Result | Register::Busy => Direction::Read,
        }
    }

    /// Name used in log output
    pub fn name(self) -> &'static str {
        match self {
            Register::OperandA => "A",
            Register::OperandB => "B",
            Register::OperandC => "C",
            Register::Result => "RESULT",
            Register::Busy => "BUSY",
        }
    }
}
