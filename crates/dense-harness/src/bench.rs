// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The timed add / accumulate loop.

use crate::{BenchConfig, BenchReport, HarnessError};
use dense_core::{ops, Generator, Shape, Tensor, TensorError};
use dense_memory::MemoryLedger;
use std::time::Instant;

/// Runs one benchmark as described by `config`.
///
/// Allocates `x` and `y` (`size × size`), fills both from one generator
/// seeded with `config.seed` (`x` first), then times `iterations - 1`
/// rounds of
///
/// ```text
/// y ← x + add_value
/// y ← x + scale · y
/// ```
///
/// Both tensors are released before the report is returned, on success
/// and on failure alike.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport, HarnessError> {
    config.validate()?;
    let ledger = config.parse_budget()?.map(MemoryLedger::new);
    if let Some(ledger) = &ledger {
        tracing::info!("memory budget: {}", ledger.budget());
    }

    let shape = Shape::matrix(config.size, config.size);
    let mut report = {
        let x = allocate(&shape, ledger.as_ref())?;
        let y = allocate(&shape, ledger.as_ref())?;

        let mut gen = Generator::new(config.seed);
        gen.fill_uniform(&x);
        gen.fill_uniform(&y);

        let initial_x_norm = ops::p_norm(&x, 2.0)?;
        let initial_y_norm = ops::p_norm(&y, 2.0)?;
        tracing::info!(
            size = config.size,
            iterations = config.iterations,
            scale = config.scale,
            "starting timed loop"
        );

        let start = Instant::now();
        for _ in 1..config.iterations {
            ops::add_scalar(&y, &x, config.add_value)?;
            ops::scaled_accumulate(&y, &x, config.scale, &y)?;
        }
        let elapsed = start.elapsed();
        tracing::info!("timed loop finished in {:.3}ms", elapsed.as_secs_f64() * 1000.0);

        BenchReport {
            size: config.size,
            iterations: config.iterations,
            scale: config.scale,
            seed: config.seed,
            initial_x_norm,
            initial_y_norm,
            final_x_norm: ops::p_norm(&x, 2.0)?,
            final_y_norm: ops::p_norm(&y, 2.0)?,
            elapsed,
            memory: None,
        }
    };

    report.memory = ledger.map(|l| l.stats());
    tracing::debug!("{}", report.summary());
    Ok(report)
}

fn allocate(shape: &Shape, ledger: Option<&MemoryLedger>) -> Result<Tensor, TensorError> {
    match ledger {
        Some(ledger) => Tensor::with_size_in(shape, ledger),
        None => Tensor::with_size(shape),
    }
}
