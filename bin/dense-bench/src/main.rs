// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dense-bench
//!
//! Command-line driver for the dense tensor add / scaled-accumulate
//! benchmark.
//!
//! ## Usage
//! ```bash
//! # 1000x1000 matrices, 100 iterations, scale 1
//! dense-bench 1000 100
//!
//! # Custom scale, JSON report
//! dense-bench 1000 100 0.5 --json
//!
//! # Settings from a file, size overridden on the command line
//! dense-bench --config bench.toml 2000
//! ```

use anyhow::Context;
use clap::Parser;
use dense_harness::{run_benchmark, BenchConfig, BenchReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dense-bench",
    about = "Times y <- x + add; y <- x + scale*y over two random square matrices",
    version,
    author,
    allow_negative_numbers = true
)]
struct Cli {
    /// Side length SZ of the square matrices.
    #[arg(required_unless_present = "config")]
    size: Option<usize>,

    /// Iteration count N (the update runs N-1 times).
    #[arg(required_unless_present = "config")]
    iterations: Option<usize>,

    /// Accumulate coefficient (defaults to 1).
    scale: Option<f64>,

    /// Path to a TOML configuration file (positional arguments override it).
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Generator seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Memory budget for tensor storage (e.g., "64M", "1G").
    #[arg(short = 'b', long)]
    memory_budget: Option<String>,

    /// Print the report as JSON instead of the classic lines.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merges the config file (if any) with command-line overrides.
    fn bench_config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_file(path)?,
            None => BenchConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(budget) = &self.memory_budget {
            config.memory_budget = Some(budget.clone());
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    init_tracing(cli.verbose);

    let config = cli.bench_config()?;
    tracing::debug!(?config, "resolved configuration");

    let report = run_benchmark(&config).context("benchmark failed")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_classic(&report);
    }
    tracing::info!("{}", report.summary());
    Ok(())
}

fn print_classic(report: &BenchReport) {
    for line in report.classic_lines() {
        println!("{line}");
    }
}

/// Sets up the tracing subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
