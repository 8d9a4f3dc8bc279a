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

//! FMA accelerator smoke test library
//!
//! Drives a memory-mapped fused-multiply-add accelerator through one
//! operation: write three operands, spin on the busy flag, read the result.
//! On hosted machines the accelerator is simulated behind a memory bus; on
//! bare-metal targets the same driver runs over volatile register accesses.
//!
//! # Example
//!
//! ```
//! use fmatest::core::{Bus, BusRegisters, Completion, FmaAccelerator, SmokeTest};
//!
//! let mut bus = Bus::new();
//! bus.register_device(Box::new(FmaAccelerator::new(0x10000, Completion::AfterPolls(3))));
//!
//! let mut test = SmokeTest::with_default_operands(BusRegisters::new(bus, 0x10000));
//! let mut out = Vec::new();
//! test.run_and_report(&mut out).unwrap();
//!
//! assert_eq!(out, b"Result: 0x41200000\n");
//! ```

pub mod config;
pub mod core;
pub mod report;
