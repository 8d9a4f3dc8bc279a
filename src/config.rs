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

//! Run configuration
//!
//! Every field has a default, so an empty configuration reproduces the plain
//! smoke test: simulated accelerator at `0x10000`, operands 2.0, 3.0, 4.0.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file
//! 3. command-line overrides
//!
//! # File Format
//!
//! ```toml
//! base_address = 0x10000
//! backend = "simulated"          # or "volatile"
//! completion = { after_polls = 4 } # or "immediate", "never"
//! report = "run.json"
//!
//! [operands]
//! a = 0x40000000
//! b = 0x40400000
//! c = 0x40800000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::driver::Operands;
use crate::core::error::{FmaError, Result};
use crate::core::fma::registers::{DEFAULT_BASE_ADDR, WINDOW_SIZE};
use crate::core::fma::Completion;

/// Where register accesses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Simulated accelerator on an in-process bus
    #[default]
    Simulated,
    /// Volatile loads and stores at the base address (bare-metal or
    /// identity-mapped targets only)
    Volatile,
}

/// Smoke test configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base address of the accelerator register window
    pub base_address: u64,

    pub backend: Backend,

    /// Busy flag behaviour of the simulated accelerator
    pub completion: Completion,

    pub operands: Operands,

    /// Write a JSON run report here
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDR,
            backend: Backend::default(),
            completion: Completion::default(),
            operands: Operands::default(),
            report: None,
        }
    }
}

/// Command-line overrides, `None` leaves the configured value alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_address: Option<u64>,
    pub backend: Option<Backend>,
    pub completion: Option<Completion>,
    pub report: Option<PathBuf>,
}

impl Config {
    /// Load and validate a TOML configuration file
    ///
    /// # Errors
    ///
    /// I/O errors reading the file, TOML syntax or schema errors, and
    /// validation failures.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// TOML syntax or schema errors, and validation failures.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate
    ///
    /// # Errors
    ///
    /// Validation failures of the combined configuration.
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(base) = overrides.base_address {
            self.base_address = base;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(completion) = overrides.completion {
            self.completion = completion;
        }
        if overrides.report.is_some() {
            self.report = overrides.report;
        }
        self.validate()
    }

    /// Check the register window is addressable
    ///
    /// # Errors
    ///
    /// [`FmaError::Config`] if the base is not 4-byte aligned, the window
    /// runs past the end of the address space, or (volatile backend) the
    /// base does not fit a native pointer.
    pub fn validate(&self) -> Result<()> {
        if self.base_address % 4 != 0 {
            return Err(FmaError::Config(format!(
                "base address 0x{:X} is not 4-byte aligned",
                self.base_address
            )));
        }

        let last = self
            .base_address
            .checked_add(WINDOW_SIZE - 1)
            .ok_or_else(|| {
                FmaError::Config(format!(
                    "register window at 0x{:X} overflows the address space",
                    self.base_address
                ))
            })?;

        if self.backend == Backend::Volatile && usize::try_from(last).is_err() {
            return Err(FmaError::Config(format!(
                "base address 0x{:X} is not addressable on this target",
                self.base_address
            )));
        }

        Ok(())
    }

    /// Whether `completion` was set but has no effect
    ///
    /// Busy timing belongs to the simulated accelerator; real hardware
    /// decides for itself when the flag clears.
    pub fn completion_ignored(&self) -> bool {
        self.backend == Backend::Volatile && self.completion != Completion::default()
    }
}

/// Parse an address given as hex (`0x10000`) or decimal (`65536`)
///
/// # Errors
///
/// A message suitable for a command-line parser.
pub fn parse_address(text: &str) -> std::result::Result<u64, String> {
    let text = text.trim().replace('_', "");
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", text, e))
}

/// Parse a completion mode: `immediate`, `never`, or a poll count
///
/// # Errors
///
/// A message suitable for a command-line parser.
pub fn parse_completion(text: &str) -> std::result::Result<Completion, String> {
    match text.trim() {
        "immediate" => Ok(Completion::Immediate),
        "never" => Ok(Completion::Never),
        polls => polls
            .parse()
            .map(Completion::AfterPolls)
            .map_err(|_| format!("expected 'immediate', 'never' or a poll count, got '{}'", polls)),
    }
}
