// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! FMA Accelerator Tests
//!
//! - `basic`: register decoding, operand latching and the FMA computation
//! - `completion`: busy flag behaviour per completion mode and stale reads

use super::*;

mod basic;

/// Operand bit patterns for 2.0, 3.0 and 4.0
const A: u32 = 0x40000000;
const B: u32 = 0x40400000;
const C: u32 = 0x40800000;

/// 2.0 * 3.0 + 4.0 = 10.0
const EXPECTED: u32 = 0x41200000;

fn write_operands(fma: &mut FmaAccelerator) {
    fma.write_register(registers::OPERAND_A, A).unwrap();
    fma.write_register(registers::OPERAND_B, B).unwrap();
    fma.write_register(registers::OPERAND_C, C).unwrap();
}
