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

//! JSON run report
//!
//! Machine-readable record of one smoke test run, for CI jobs that collect
//! results from several boards. Written next to, never instead of, the
//! stdout line.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{Backend, Config};
use crate::core::driver::{format_result, Operands, Outcome};
use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub backend: Backend,
    pub base_address: u64,
    pub operands: Operands,
    /// Raw result register value
    pub result: u32,
    /// The line printed to stdout
    pub line: String,
    pub busy_polls: u64,
}

impl RunReport {
    pub fn new(config: &Config, outcome: &Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend: config.backend,
            base_address: config.base_address,
            operands: config.operands,
            result: outcome.result,
            line: format_result(outcome.result),
            busy_polls: outcome.busy_polls,
        }
    }

    /// # Errors
    ///
    /// Serialization errors.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// I/O or serialization errors.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;

        info!("Run report written to {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// I/O or deserialization errors.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
