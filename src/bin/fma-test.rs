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

//! FMA accelerator smoke test
//!
//! Writes 2.0, 3.0 and 4.0 to the accelerator, waits for the busy flag to
//! clear and prints `Result: 0x<hex>` on stdout. Diagnostics go to stderr.
//! With no arguments the simulated accelerator at 0x10000 is used.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use fmatest::config::{self, Backend, Config, Overrides};
use fmatest::core::error::{FmaError, Result};
use fmatest::core::fma::{Completion, FmaAccelerator};
use fmatest::core::memory::Bus;
use fmatest::core::{BusRegisters, Outcome, SmokeTest, VolatileRegisters};
use fmatest::report::RunReport;
use log::{error, info, warn};

/// FMA accelerator smoke test
#[derive(Parser)]
#[command(name = "fma-test")]
#[command(about = "Run one operation on the FMA accelerator and print the result", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Base address of the register window (hex or decimal)
    #[arg(short = 'b', long, value_parser = config::parse_address)]
    base: Option<u64>,

    /// Register access backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Simulated busy time: "immediate", "never" or a number of polls
    #[arg(short = 'l', long, value_parser = config::parse_completion)]
    latency: Option<Completion>,

    /// Write a JSON run report to this path
    #[arg(short = 'r', long)]
    report: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_address: self.base,
            backend: self.backend,
            completion: self.latency,
            report: self.report.clone(),
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply(args.overrides())?;
    Ok(config)
}

fn run_simulated(config: &Config) -> Result<Outcome> {
    let mut bus = Bus::new();
    bus.register_device(Box::new(FmaAccelerator::new(
        config.base_address,
        config.completion,
    )));

    let regs = BusRegisters::new(bus, config.base_address);
    let mut test = SmokeTest::new(regs, config.operands);
    let outcome = test.run_and_report(io::stdout().lock())?;

    let faults = test.registers().bus().faults();
    if !faults.is_empty() {
        warn!("{} bus faults during run", faults.len());
    }

    Ok(outcome)
}

fn run_volatile(config: &Config) -> Result<Outcome> {
    let base = usize::try_from(config.base_address).map_err(|_| {
        FmaError::Config(format!(
            "base address 0x{:X} is not addressable on this target",
            config.base_address
        ))
    })?;

    // SAFETY: selecting the volatile backend asserts that the accelerator
    // window is mapped at `base` in this address space
    let regs = unsafe { VolatileRegisters::new(base) };
    let mut test = SmokeTest::new(regs, config.operands);
    Ok(test.run_and_report(io::stdout().lock())?)
}

fn main() -> Result<()> {
    // Optional .env for RUST_LOG and friends
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Stdout carries only the result line; keep logs quiet by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    info!("fma-test v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    info!(
        "Backend: {:?} | Base: 0x{:08X} | Completion: {:?}",
        config.backend, config.base_address, config.completion
    );

    if config.completion_ignored() {
        warn!(
            "Completion {:?} only applies to the simulated backend, ignoring it",
            config.completion
        );
    }

    let outcome = match config.backend {
        Backend::Simulated => run_simulated(&config)?,
        Backend::Volatile => run_volatile(&config)?,
    };

    info!("Busy flag cleared after {} polls", outcome.busy_polls);

    if let Some(path) = &config.report {
        if let Err(e) = RunReport::new(&config, &outcome).write_to(path) {
            error!("Failed to write run report: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
