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

//! Custom assertions for bus traces

use fmatest::core::memory::{Access, AccessKind, Bus};

/// Position of the first traced access matching `kind` and `address`
#[allow(dead_code)]
pub fn position_of(bus: &Bus, kind: AccessKind, address: u64) -> Option<usize> {
    bus.trace()
        .iter()
        .position(|access| access.kind == kind && access.address == address)
}

/// Assert the traced access at `index` is a write of `value` to `address`
#[allow(dead_code)]
pub fn assert_write(bus: &Bus, index: usize, address: u64, value: u32) {
    let expected = Access {
        kind: AccessKind::Write,
        address,
        value,
    };
    let actual = bus.trace().get(index);
    assert_eq!(
        actual,
        Some(&expected),
        "Access #{} mismatch: expected write 0x{:08X} to 0x{:08X}",
        index,
        value,
        address
    );
}

/// Assert the bus rejected nothing
#[allow(dead_code)]
pub fn assert_no_faults(bus: &Bus) {
    assert!(
        bus.faults().is_empty(),
        "Unexpected bus faults: {:?}",
        bus.faults()
    );
}
