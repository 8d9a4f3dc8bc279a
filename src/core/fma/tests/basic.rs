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

//! Register decoding, latching and arithmetic

use super::*;
use crate::core::error::FmaError;
use crate::core::memory::Bus;
use proptest::prelude::*;

#[test]
fn test_power_on_state() {
    let fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    assert!(!fma.is_busy());
    assert_eq!(fma.result(), 0);
    assert_eq!(fma.operands(), (0, 0, 0));
    assert_eq!(fma.pending(), PendingOperands::empty());
    assert_eq!(fma.operations_completed(), 0);
}

#[test]
fn test_address_range() {
    let fma = FmaAccelerator::new(0x10000, Completion::Immediate);
    assert_eq!(fma.address_range(), (0x10000, 0x10013));

    let fma = FmaAccelerator::new(0x4000_0000, Completion::Immediate);
    assert_eq!(fma.address_range(), (0x4000_0000, 0x4000_0013));
}

#[test]
fn test_window_at_top_of_address_space() {
    let base = u64::MAX - 0x13;
    let fma = FmaAccelerator::new(base, Completion::Immediate);
    assert_eq!(fma.address_range(), (base, u64::MAX));

    let mut bus = Bus::new();
    bus.register_device(Box::new(fma));
    bus.write32(base + registers::OPERAND_A, A).unwrap();
    bus.write32(base + registers::OPERAND_B, B).unwrap();
    bus.write32(base + registers::OPERAND_C, C).unwrap();

    assert_eq!(bus.read32(base + registers::BUSY).unwrap(), 0);
    assert_eq!(bus.read32(base + registers::RESULT).unwrap(), EXPECTED);
    assert!(bus.faults().is_empty());
}

#[test]
fn test_two_three_four_gives_ten() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    write_operands(&mut fma);

    assert_eq!(fma.read_register(registers::BUSY).unwrap(), 0);
    assert_eq!(fma.read_register(registers::RESULT).unwrap(), EXPECTED);
    assert_eq!(fma.operations_completed(), 1);
}

#[test]
fn test_partial_operands_do_not_start() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::AfterPolls(3));

    fma.write_register(registers::OPERAND_A, A).unwrap();
    fma.write_register(registers::OPERAND_B, B).unwrap();

    assert!(!fma.is_busy());
    assert_eq!(fma.pending(), PendingOperands::A | PendingOperands::B);
    assert_eq!(fma.read_register(registers::BUSY).unwrap(), 0);
}

#[test]
fn test_operand_order_does_not_matter() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    fma.write_register(registers::OPERAND_C, C).unwrap();
    fma.write_register(registers::OPERAND_A, A).unwrap();
    fma.write_register(registers::OPERAND_B, B).unwrap();

    assert_eq!(fma.read_register(registers::RESULT).unwrap(), EXPECTED);
}

#[test]
fn test_rewriting_an_operand_before_start_keeps_latest() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    fma.write_register(registers::OPERAND_A, 0x3F800000).unwrap(); // 1.0
    fma.write_register(registers::OPERAND_A, A).unwrap();
    fma.write_register(registers::OPERAND_B, B).unwrap();
    fma.write_register(registers::OPERAND_C, C).unwrap();

    assert_eq!(fma.result(), EXPECTED);
    assert_eq!(fma.operations_completed(), 1);
}

#[test]
fn test_pending_clears_on_start() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    write_operands(&mut fma);
    assert_eq!(fma.pending(), PendingOperands::empty());

    // A second operation needs all three operands again
    fma.write_register(registers::OPERAND_A, C).unwrap();
    assert_eq!(fma.operations_completed(), 1);
    assert_eq!(fma.result(), EXPECTED);
}

#[test]
fn test_result_and_busy_are_read_only() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    assert!(matches!(
        fma.write_register(registers::RESULT, 1),
        Err(FmaError::ReadOnlyRegister { offset: 0x0C })
    ));
    assert!(matches!(
        fma.write_register(registers::BUSY, 0),
        Err(FmaError::ReadOnlyRegister { offset: 0x10 })
    ));
}

#[test]
fn test_operands_are_write_only() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    for offset in [registers::OPERAND_A, registers::OPERAND_B, registers::OPERAND_C] {
        assert!(matches!(
            fma.read_register(offset),
            Err(FmaError::WriteOnlyRegister { .. })
        ));
    }
}

#[test]
fn test_unknown_offset_is_invalid_access() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

    assert!(matches!(
        fma.read_register(0x14),
        Err(FmaError::InvalidMemoryAccess { address: 0x10014 })
    ));
    assert!(matches!(
        fma.write_register(0x02, 0),
        Err(FmaError::InvalidMemoryAccess { address: 0x10002 })
    ));
}

#[test]
fn test_reset() {
    let mut fma = FmaAccelerator::new(0x10000, Completion::Never);

    write_operands(&mut fma);
    assert!(fma.is_busy());

    fma.reset();

    assert!(!fma.is_busy());
    assert_eq!(fma.operands(), (0, 0, 0));
    assert_eq!(fma.busy_reads(), 0);
    assert_eq!(fma.completion(), Completion::Never);
    assert_eq!(fma.base(), 0x10000);
}

#[test]
fn test_single_rounding() {
    // (1 + 2^-23) * (1 - 2^-23) = 1 - 2^-46, which rounds to 1.0 when the
    // product is rounded first. Adding -1.0 exposes the difference.
    let a = 0x3F800001;
    let b = 0x3F7FFFFE;
    let c = 0xBF800000;

    let fused = f32::from_bits(fused_multiply_add(a, b, c));
    assert!(fused < 0.0);
    assert!(fused != 0.0);
}

#[test]
fn test_device_name() {
    let fma = FmaAccelerator::new(0x10000, Completion::Immediate);
    assert_eq!(fma.name(), "FMA Accelerator");
}

proptest! {
    #[test]
    fn prop_device_result_matches_mul_add(a: f32, b: f32, c: f32) {
        let mut fma = FmaAccelerator::new(0x10000, Completion::Immediate);

        fma.write_register(registers::OPERAND_A, a.to_bits()).unwrap();
        fma.write_register(registers::OPERAND_B, b.to_bits()).unwrap();
        fma.write_register(registers::OPERAND_C, c.to_bits()).unwrap();

        let expected = a.mul_add(b, c);
        let got = f32::from_bits(fma.read_register(registers::RESULT).unwrap());

        if expected.is_nan() {
            prop_assert!(got.is_nan());
        } else {
            prop_assert_eq!(got.to_bits(), expected.to_bits());
        }
    }
}
