// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the benchmark harness.

/// Errors that can occur while configuring or running a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Configuration could not be read, parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),

    /// A tensor operation failed during setup or the timed loop.
    #[error("tensor error: {0}")]
    Tensor(#[from] dense_core::TensorError),
}
