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

//! Test fixtures for common test scenarios

use std::process::{Command, Stdio};

use fmatest::core::fma::{Completion, FmaAccelerator};
use fmatest::core::memory::Bus;
use fmatest::core::mmio::BusRegisters;

/// Default accelerator base address
pub const BASE: u64 = 0x10000;

/// Create a traced bus with one accelerator at `base`
#[allow(dead_code)]
pub fn create_traced_bus(base: u64, completion: Completion) -> Bus {
    let mut bus = Bus::new();
    bus.register_device(Box::new(FmaAccelerator::new(base, completion)));
    bus.enable_trace();
    bus
}

/// Register file over a traced bus with one accelerator at `BASE`
#[allow(dead_code)]
pub fn create_registers(completion: Completion) -> BusRegisters {
    BusRegisters::new(create_traced_bus(BASE, completion), BASE)
}

/// Command for the smoke test binary with stdout/stderr captured
#[allow(dead_code)]
pub fn fma_test_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fma-test"));
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_remove("RUST_LOG");
    cmd
}
