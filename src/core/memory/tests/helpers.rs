// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Helper functions for memory tests

use super::*;
use crate::core::fma::{Completion, FmaAccelerator};

/// Base address used by the bus tests
pub const TEST_BASE: u64 = 0x10000;

/// Creates a Bus with one accelerator mapped at `TEST_BASE`
pub fn create_test_bus(completion: Completion) -> Bus {
    let mut bus = Bus::new();
    bus.register_device(Box::new(FmaAccelerator::new(TEST_BASE, completion)));
    bus
}
