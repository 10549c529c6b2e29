// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dense-core
//!
//! Dense `f64` tensors: shared storage, strided views, a seedable
//! generator, elementwise kernels and p-norm reductions.
//!
//! This crate provides:
//! - [`Storage`]: a reference-counted flat buffer, optionally charged to a
//!   [`dense_memory::MemoryLedger`].
//! - [`Tensor`]: a `(storage, sizes, strides, offset)` view. Several
//!   tensors may alias one storage.
//! - [`Shape`]: dimension extents used to size new tensors.
//! - [`Generator`]: an explicit MT19937 stream with `fill_uniform`.
//! - [`ops`]: `add_scalar`, `scaled_accumulate` and friends, plus
//!   `p_norm` and `sum`.
//!
//! # Aliasing
//! Kernels take every operand by shared reference, so the in-place update
//! `y ← x + scale·y` is simply:
//! ```
//! use dense_core::{ops, Generator, Shape, Tensor};
//!
//! let shape = Shape::matrix(4, 4);
//! let x = Tensor::with_size(&shape).unwrap();
//! let y = Tensor::with_size(&shape).unwrap();
//! let mut gen = Generator::new(1111);
//! gen.fill_uniform(&x);
//! gen.fill_uniform(&y);
//!
//! ops::add_scalar(&y, &x, 5.0).unwrap();
//! ops::scaled_accumulate(&y, &x, 1.0, &y).unwrap();
//! assert!(ops::p_norm(&y, 2.0).unwrap() > ops::p_norm(&x, 2.0).unwrap());
//! ```
//!
//! # Threading
//! Storages are `Rc`-shared and therefore stay on the thread that made
//! them. Run one generator and one arithmetic pipeline per thread.

mod error;
pub mod ops;
mod random;
mod shape;
mod storage;
mod tensor;

pub use error::TensorError;
pub use random::Generator;
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;
