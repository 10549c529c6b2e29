// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmark results.
//!
//! [`BenchReport`] carries the norms measured around the timed loop, the
//! loop's wall-clock duration and, for budgeted runs, the ledger statistics.

use dense_memory::AllocationStats;
use std::time::Duration;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchReport {
    /// Side length of the square matrices.
    pub size: usize,
    /// Requested iteration count `N`.
    pub iterations: usize,
    pub scale: f64,
    pub seed: u64,
    /// 2-norm of `x` right after the fill.
    pub initial_x_norm: f64,
    /// 2-norm of `y` right after the fill.
    pub initial_y_norm: f64,
    /// 2-norm of `x` after the loop.
    pub final_x_norm: f64,
    /// 2-norm of `y` after the loop.
    pub final_y_norm: f64,
    /// Wall-clock time of the loop alone.
    pub elapsed: Duration,
    /// Ledger statistics, once all tensors have been released.
    pub memory: Option<AllocationStats>,
}

impl BenchReport {
    /// Number of loop bodies executed (`N - 1`).
    pub fn updates(&self) -> usize {
        self.iterations.saturating_sub(1)
    }

    /// Elements written per second across both kernels.
    pub fn elements_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        let per_update = 2 * self.size * self.size;
        (self.updates() * per_update) as f64 / secs
    }

    /// The benchmark's traditional plain-text output, one line per entry.
    pub fn classic_lines(&self) -> Vec<String> {
        vec![
            format!("SZ={}", self.size),
            format!("N ={}", self.iterations),
            format!("scale ={:.6}", self.scale),
            format!("x\t{:.6}", self.initial_x_norm),
            format!("y\t{:.6}", self.initial_y_norm),
            format!("time (s) {:.6}", self.elapsed.as_secs_f64()),
            format!("x\t{:.6}", self.final_x_norm),
            format!("y\t{:.6}", self.final_y_norm),
        ]
    }

    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Benchmark: {sz}x{sz}, {} updates in {:.3}ms ({:.1} Melem/s), |x| {:.6}, |y| {:.6}",
            self.updates(),
            self.elapsed.as_secs_f64() * 1000.0,
            self.elements_per_second() / 1e6,
            self.final_x_norm,
            self.final_y_norm,
            sz = self.size,
        );
        if let Some(memory) = &self.memory {
            s.push_str(", ");
            s.push_str(&memory.summary());
        }
        s
    }
}
