// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dense-harness
//!
//! The micro-benchmark that exercises `dense-core`: two random square
//! matrices, a fixed seed, and a timed loop of `add_scalar` followed by an
//! in-place `scaled_accumulate`.
//!
//! The harness takes:
//! - A [`BenchConfig`] (built from `SZ N [SCALE]` or read from TOML).
//! - An optional memory budget, enforced through `dense-memory`.
//!
//! And produces a [`BenchReport`] with the norms around the loop and its
//! wall-clock duration.
//!
//! ```
//! use dense_harness::{run_benchmark, BenchConfig};
//!
//! let report = run_benchmark(&BenchConfig::new(4, 3, None)).unwrap();
//! assert!(report.final_y_norm > report.final_x_norm);
//! ```

mod bench;
mod config;
mod error;
mod report;

pub use bench::run_benchmark;
pub use config::{BenchConfig, DEFAULT_SEED};
pub use error::HarnessError;
pub use report::BenchReport;
