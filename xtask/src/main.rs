//! Development tasks for fmatest
//!
//! `cargo run -p xtask -- <task>`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

/// What the default operands (2.0 * 3.0 + 4.0) must print
const EXPECTED_LINE: &str = "Result: 0x41200000";

/// Busy latencies the smoke task runs by default: no busy phase, one poll,
/// a long wait
const SMOKE_LATENCIES: [&str; 3] = ["immediate", "1", "200"];

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for fmatest")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// fmt check, clippy, tests and smoke runs, stopping at the first failure
    Ci,
    /// rustfmt and clippy only
    Lint {
        /// Rewrite instead of checking
        #[arg(long)]
        fix: bool,
    },
    /// Run tests, optionally for one module
    Test {
        #[arg(value_enum)]
        module: Option<Module>,
        /// Doc tests only
        #[arg(long, conflicts_with = "module")]
        doc: bool,
    },
    /// Criterion benchmarks
    Bench {
        /// Benchmark name filter, e.g. "smoke_test"
        filter: Option<String>,
    },
    /// Run the fma-test binary and check the line it prints
    Smoke {
        /// Latencies to run; defaults to immediate, 1 and 200 polls
        #[arg(short = 'l', long = "latency")]
        latencies: Vec<String>,
        #[arg(long)]
        release: bool,
    },
}

/// Library module with its own unit tests
#[derive(Clone, Copy, ValueEnum)]
enum Module {
    Driver,
    Fma,
    Memory,
    Mmio,
    Config,
    Report,
}

impl Module {
    fn test_filter(self) -> &'static str {
        match self {
            Module::Driver => "core::driver",
            Module::Fma => "core::fma",
            Module::Memory => "core::memory",
            Module::Mmio => "core::mmio",
            Module::Config => "config::",
            Module::Report => "report::",
        }
    }
}

fn main() -> Result<()> {
    match Cli::parse().task {
        Task::Ci => ci(),
        Task::Lint { fix } => lint(fix),
        Task::Test { module, doc } => test(module, doc),
        Task::Bench { filter } => {
            let mut args = vec!["bench"];
            args.extend(filter.as_deref());
            cargo(&args)
        }
        Task::Smoke { latencies, release } => {
            let latencies: Vec<&str> = if latencies.is_empty() {
                SMOKE_LATENCIES.to_vec()
            } else {
                latencies.iter().map(String::as_str).collect()
            };
            smoke(&latencies, release)
        }
    }
}

fn ci() -> Result<()> {
    let start = Instant::now();

    step("rustfmt", || lint_fmt(false))?;
    step("clippy", || lint_clippy(false))?;
    step("tests", || test(None, false))?;
    step("smoke", || smoke(&SMOKE_LATENCIES, false))?;

    println!(
        "{} in {:.2}s",
        "CI passed".green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn lint(fix: bool) -> Result<()> {
    lint_fmt(fix)?;
    lint_clippy(fix)
}

fn lint_fmt(fix: bool) -> Result<()> {
    if fix {
        cargo(&["fmt", "--all"])
    } else {
        cargo(&["fmt", "--all", "--", "--check"])
    }
}

fn lint_clippy(fix: bool) -> Result<()> {
    if fix {
        cargo(&["clippy", "--workspace", "--all-targets", "--fix", "--allow-dirty"])
    } else {
        cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
    }
}

fn test(module: Option<Module>, doc: bool) -> Result<()> {
    match (module, doc) {
        (_, true) => cargo(&["test", "--doc"]),
        (Some(module), false) => cargo(&["test", "--lib", module.test_filter()]),
        (None, false) => cargo(&["test", "--workspace"]),
    }
}

/// Build once, then run the binary per latency and compare its stdout
fn smoke(latencies: &[&str], release: bool) -> Result<()> {
    let profile = if release { "release" } else { "debug" };
    let mut build = vec!["build", "--bin", "fma-test"];
    if release {
        build.push("--release");
    }
    cargo(&build)?;

    let target = std::env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "target".into());
    let binary = format!("{}/{}/fma-test{}", target, profile, std::env::consts::EXE_SUFFIX);

    for latency in latencies {
        let output = Command::new(&binary)
            .args(["--latency", latency])
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("failed to start {}", binary))?;

        check_smoke_output(latency, &output)?;
        println!("  {} latency {}", "ok".green(), latency.bold());
    }
    Ok(())
}

fn check_smoke_output(latency: &str, output: &Output) -> Result<()> {
    if !output.status.success() {
        bail!("fma-test --latency {} exited with {}", latency, output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.trim_end() != EXPECTED_LINE {
        bail!(
            "fma-test --latency {} printed {:?}, expected {:?}",
            latency,
            stdout.trim_end(),
            EXPECTED_LINE
        );
    }
    Ok(())
}

fn step(name: &str, run: impl FnOnce() -> Result<()>) -> Result<()> {
    println!("{} {}", "==>".blue().bold(), name.bold());
    let start = Instant::now();

    run().with_context(|| format!("{} failed", name))?;

    println!(
        "{} {} ({:.2}s)\n",
        "done".green(),
        name,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new(std::env::var("CARGO").unwrap_or_else(|_| "cargo".into()))
        .args(args)
        .status()
        .context("failed to run cargo")?;

    if !status.success() {
        bail!("cargo {} exited with {}", args.join(" "), status);
    }
    Ok(())
}
