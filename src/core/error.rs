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

/// Smoke test error types
use thiserror::Error;

/// Result type for bus, device and configuration operations
pub type Result<T> = std::result::Result<T, FmaError>;

/// Main error type
///
/// The driver sequence itself never produces one of these: register access
/// on real hardware has no error channel. They come from the simulated bus,
/// the simulated accelerator, and start-up (configuration, report output).
#[derive(Error, Debug)]
pub enum FmaError {
    #[error("Invalid memory access at 0x{address:08X}")]
    InvalidMemoryAccess { address: u64 },

    #[error("Unaligned memory access: {size}-byte access at 0x{address:08X}")]
    UnalignedAccess { address: u64, size: u8 },

    #[error("Write to read-only register at offset 0x{offset:02X}")]
    ReadOnlyRegister { offset: u64 },

    #[error("Read from write-only register at offset 0x{offset:02X}")]
    WriteOnlyRegister { offset: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
