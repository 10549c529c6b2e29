// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor arithmetic operations.
//!
//! Elementwise kernels write into a caller-provided destination, which may
//! alias any source. Reductions return a scalar and never mutate.

mod elementwise;
mod reduce;
pub(crate) mod walk;

pub use elementwise::{add_scalar, copy, fill, mul, mul_scalar, scaled_accumulate};
pub use reduce::{p_norm, sum};
