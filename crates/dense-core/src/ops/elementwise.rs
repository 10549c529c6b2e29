// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise arithmetic over same-sized tensors.
//!
//! All operands are shared references: the destination may be the same
//! tensor as a source, or another view of the same storage. Shapes are
//! checked before the first write, so a failed call leaves `dst` as it was.
//! Each logical position is fully read before it is written.

use super::walk::for_each_position;
use crate::{Tensor, TensorError};

/// `dst[idx] = src[idx] + value` for every logical position.
///
/// # Examples
/// ```
/// use dense_core::{ops, Shape, Tensor};
/// let x = Tensor::from_vec(Shape::vector(3), vec![1.0, 2.0, 3.0]).unwrap();
/// ops::add_scalar(&x, &x, 5.0).unwrap();
/// assert_eq!(x.to_vec(), vec![6.0, 7.0, 8.0]);
/// ```
pub fn add_scalar(dst: &Tensor, src: &Tensor, value: f64) -> Result<(), TensorError> {
    ensure_same_sizes("add_scalar", dst, src)?;
    let (d, s) = (dst.cells(), src.cells());
    for_each_position(dst.sizes(), [dst, src], |[di, si]| {
        d[di].set(s[si].get() + value);
    });
    Ok(())
}

/// `dst[idx] = a[idx] + scale * b[idx]` for every logical position.
///
/// The operand order is fixed: `a` is added unscaled and `b` is scaled. The
/// benchmark update `y ← x + scale·y` is `scaled_accumulate(&y, &x, scale, &y)`.
///
/// # Errors
/// [`TensorError::ShapeMismatch`] unless `dst`, `a` and `b` all have the
/// same sizes.
pub fn scaled_accumulate(
    dst: &Tensor,
    a: &Tensor,
    scale: f64,
    b: &Tensor,
) -> Result<(), TensorError> {
    ensure_same_sizes("scaled_accumulate", dst, a)?;
    ensure_same_sizes("scaled_accumulate", dst, b)?;
    let (d, x, y) = (dst.cells(), a.cells(), b.cells());
    for_each_position(dst.sizes(), [dst, a, b], |[di, ai, bi]| {
        let value = x[ai].get() + scale * y[bi].get();
        d[di].set(value);
    });
    Ok(())
}

/// `dst[idx] = src[idx] * value`.
pub fn mul_scalar(dst: &Tensor, src: &Tensor, value: f64) -> Result<(), TensorError> {
    ensure_same_sizes("mul_scalar", dst, src)?;
    let (d, s) = (dst.cells(), src.cells());
    for_each_position(dst.sizes(), [dst, src], |[di, si]| {
        d[di].set(s[si].get() * value);
    });
    Ok(())
}

/// `dst[idx] = a[idx] * b[idx]`.
pub fn mul(dst: &Tensor, a: &Tensor, b: &Tensor) -> Result<(), TensorError> {
    ensure_same_sizes("mul", dst, a)?;
    ensure_same_sizes("mul", dst, b)?;
    let (d, x, y) = (dst.cells(), a.cells(), b.cells());
    for_each_position(dst.sizes(), [dst, a, b], |[di, ai, bi]| {
        d[di].set(x[ai].get() * y[bi].get());
    });
    Ok(())
}

/// Sets every logical element of `dst` to `value`.
pub fn fill(dst: &Tensor, value: f64) {
    let d = dst.cells();
    for_each_position(dst.sizes(), [dst], |[di]| d[di].set(value));
}

/// `dst[idx] = src[idx]`.
pub fn copy(dst: &Tensor, src: &Tensor) -> Result<(), TensorError> {
    ensure_same_sizes("copy", dst, src)?;
    let (d, s) = (dst.cells(), src.cells());
    for_each_position(dst.sizes(), [dst, src], |[di, si]| {
        d[di].set(s[si].get());
    });
    Ok(())
}

fn ensure_same_sizes(op: &'static str, lhs: &Tensor, rhs: &Tensor) -> Result<(), TensorError> {
    if lhs.sizes() != rhs.sizes() {
        return Err(TensorError::ShapeMismatch {
            op,
            lhs: lhs.shape(),
            rhs: rhs.shape(),
        });
    }
    Ok(())
}
