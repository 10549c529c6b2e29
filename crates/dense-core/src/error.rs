// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::Shape;
use dense_memory::MemoryError;

/// Errors that can occur during tensor construction and arithmetic.
///
/// Every variant is reported to the immediate caller; nothing is retried or
/// clamped inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// A storage buffer could not be obtained (budget, allocator, or size overflow).
    #[error("allocation failed: {0}")]
    Allocation(#[from] MemoryError),

    /// A negative, overflowing or otherwise malformed shape, stride or view.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Operands of an elementwise call have differing sizes.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// A scalar argument outside the operation's domain.
    #[error("invalid argument for {op}: {detail}")]
    InvalidArgument { op: &'static str, detail: String },
}
