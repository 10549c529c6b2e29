// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: the add / accumulate loop the micro-benchmark runs,
//! driven through the public API only.

use dense_core::{ops, Generator, Shape, Tensor};
use dense_memory::{MemoryBudget, MemoryLedger};

// ── Helpers ────────────────────────────────────────────────────

fn seeded_pair(side: usize, seed: u64) -> (Tensor, Tensor) {
    let shape = Shape::matrix(side, side);
    let x = Tensor::with_size(&shape).unwrap();
    let y = Tensor::with_size(&shape).unwrap();
    let mut gen = Generator::new(seed);
    gen.fill_uniform(&x);
    gen.fill_uniform(&y);
    (x, y)
}

fn run_loop(x: &Tensor, y: &Tensor, iterations: usize, scale: f64) {
    for _ in 1..iterations {
        ops::add_scalar(y, x, 5.0).unwrap();
        ops::scaled_accumulate(y, x, scale, y).unwrap();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[test]
fn test_sz4_n3_grows_y_and_keeps_x() {
    let (x, y) = seeded_pair(4, 1111);
    let x_before = ops::p_norm(&x, 2.0).unwrap();

    run_loop(&x, &y, 3, 1.0);

    let x_after = ops::p_norm(&x, 2.0).unwrap();
    let y_after = ops::p_norm(&y, 2.0).unwrap();
    assert_eq!(x_before, x_after);
    assert!(y_after > x_after);
}

#[test]
fn test_loop_result_is_closed_form() {
    // Each iteration overwrites y with x + scale * (x + 5).
    let (x, y) = seeded_pair(3, 1111);
    let scale = 0.25;
    run_loop(&x, &y, 4, scale);
    for (xv, yv) in x.to_vec().iter().zip(y.to_vec()) {
        let expected = xv + scale * (xv + 5.0);
        assert!((yv - expected).abs() < 1e-12);
    }
}

#[test]
fn test_single_iteration_runs_nothing() {
    let (x, y) = seeded_pair(4, 1111);
    let y_before = y.to_vec();
    run_loop(&x, &y, 1, 1.0);
    assert_eq!(y.to_vec(), y_before);
}

#[test]
fn test_same_seed_same_norms() {
    let (x1, y1) = seeded_pair(8, 1111);
    let (x2, y2) = seeded_pair(8, 1111);
    run_loop(&x1, &y1, 5, 1.0);
    run_loop(&x2, &y2, 5, 1.0);
    assert_eq!(ops::p_norm(&y1, 2.0).unwrap(), ops::p_norm(&y2, 2.0).unwrap());
    assert_eq!(ops::p_norm(&x1, 2.0).unwrap(), ops::p_norm(&x2, 2.0).unwrap());
}

#[test]
fn test_budgeted_tensors_release_on_every_path() {
    let ledger = MemoryLedger::new(MemoryBudget::from_bytes(2 * 16 * 8));
    {
        let shape = Shape::matrix(4, 4);
        let x = Tensor::with_size_in(&shape, &ledger).unwrap();
        let y = Tensor::with_size_in(&shape, &ledger).unwrap();
        // A third tensor does not fit.
        assert!(Tensor::with_size_in(&shape, &ledger).is_err());

        let mut gen = Generator::new(1111);
        gen.fill_uniform(&x);
        gen.fill_uniform(&y);
        run_loop(&x, &y, 3, 1.0);

        // A failing call in the middle of the pipeline.
        let wrong = Tensor::with_size(&Shape::matrix(2, 2)).unwrap();
        assert!(ops::scaled_accumulate(&y, &x, 1.0, &wrong).is_err());
    }
    assert_eq!(ledger.reserved_bytes(), 0);
    assert_eq!(ledger.stats().total_releases, 2);
}
