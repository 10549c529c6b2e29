// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Sweep the accumulate coefficient on a fixed-size problem.
//!
//! Runs the benchmark once per scale with the same seed, so every run
//! starts from identical `x` and `y`, and prints a small comparison table.
//!
//! ```bash
//! cargo run -p dense-harness --example scale_sweep
//! ```

use dense_harness::{run_benchmark, BenchConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("info").init();

    let size = 256;
    let iterations = 50;

    println!("Scale sweep: {size}x{size}, N = {iterations}");
    println!();
    println!(
        "{:<8} {:>14} {:>14} {:>12} {:>12}",
        "scale", "|x|", "|y|", "time (ms)", "Melem/s"
    );
    println!("{}", "─".repeat(64));

    for scale in [0.0, 0.25, 0.5, 1.0, 2.0] {
        let config = BenchConfig {
            memory_budget: Some("4M".into()),
            ..BenchConfig::new(size, iterations, Some(scale))
        };
        let report = run_benchmark(&config)?;
        println!(
            "{:<8.2} {:>14.6} {:>14.6e} {:>12.3} {:>12.1}",
            scale,
            report.final_x_norm,
            report.final_y_norm,
            report.elapsed.as_secs_f64() * 1000.0,
            report.elements_per_second() / 1e6,
        );
    }

    Ok(())
}
