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

//! Core components
//!
//! - Register map of the FMA accelerator
//! - Register access primitives and the `RegisterFile` capability
//! - Simulated memory bus and I/O device trait
//! - Simulated FMA accelerator
//! - Smoke test driver

pub mod driver;
pub mod error;
pub mod fma;
pub mod memory;
pub mod mmio;

// Re-export commonly used types
pub use driver::{format_result, Operands, Outcome, SmokeTest};
pub use error::{FmaError, Result};
pub use fma::{Completion, FmaAccelerator};
pub use memory::Bus;
pub use mmio::{BusRegisters, RegisterFile, VolatileRegisters};
