// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reductions over a tensor's logical elements.

use super::walk::for_each_position;
use crate::{Tensor, TensorError};

/// Computes `(Σ |x|^p)^(1/p)` over all logical elements, in row-major order.
///
/// - `p = 2` keeps a running `(scale, ssq)` pair so that no intermediate
///   square overflows or underflows.
/// - `p = 1` is the sum of absolute values.
/// - `p = ∞` is the largest absolute value.
///
/// An empty tensor has norm 0.
///
/// # Errors
/// [`TensorError::InvalidArgument`] if `p` is NaN or not positive.
///
/// # Examples
/// ```
/// use dense_core::{ops, Shape, Tensor};
/// let t = Tensor::from_vec(Shape::vector(2), vec![3.0, -4.0]).unwrap();
/// assert_eq!(ops::p_norm(&t, 2.0).unwrap(), 5.0);
/// assert_eq!(ops::p_norm(&t, f64::INFINITY).unwrap(), 4.0);
/// ```
pub fn p_norm(tensor: &Tensor, p: f64) -> Result<f64, TensorError> {
    if p.is_nan() || p <= 0.0 {
        return Err(TensorError::InvalidArgument {
            op: "p_norm",
            detail: format!("p must be positive, got {p}"),
        });
    }

    let cells = tensor.cells();
    let visit = |f: &mut dyn FnMut(f64)| {
        for_each_position(tensor.sizes(), [tensor], |[i]| f(cells[i].get().abs()));
    };

    let norm = if p == f64::INFINITY {
        let mut max = 0.0f64;
        visit(&mut |v| max = max.max(v));
        max
    } else if p == 1.0 {
        let mut sum = 0.0;
        visit(&mut |v| sum += v);
        sum
    } else if p == 2.0 {
        let mut scale = 0.0f64;
        let mut ssq = 1.0f64;
        visit(&mut |v| {
            if v == 0.0 {
                return;
            }
            if scale < v {
                ssq = 1.0 + ssq * (scale / v) * (scale / v);
                scale = v;
            } else if v == scale {
                // Also covers inf == inf, where v / scale would be NaN.
                ssq += 1.0;
            } else {
                ssq += (v / scale) * (v / scale);
            }
        });
        scale * ssq.sqrt()
    } else {
        let mut sum = 0.0;
        visit(&mut |v| sum += v.powf(p));
        sum.powf(p.recip())
    };
    Ok(norm)
}

/// Sums the logical elements in row-major order.
pub fn sum(tensor: &Tensor) -> f64 {
    let cells = tensor.cells();
    let mut total = 0.0;
    for_each_position(tensor.sizes(), [tensor], |[i]| total += cells[i].get());
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    fn vector(values: &[f64]) -> Tensor {
        Tensor::from_vec(Shape::vector(values.len()), values.to_vec()).unwrap()
    }

    #[test]
    fn test_two_norm_zeros() {
        let t = Tensor::with_size(&Shape::matrix(4, 4)).unwrap();
        assert_eq!(p_norm(&t, 2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_two_norm_single_element() {
        assert_eq!(p_norm(&vector(&[-3.5]), 2.0).unwrap(), 3.5);
        assert_eq!(p_norm(&vector(&[1e-300]), 2.0).unwrap(), 1e-300);
    }

    #[test]
    fn test_two_norm_does_not_overflow() {
        let t = vector(&[3e200, 4e200]);
        let n = p_norm(&t, 2.0).unwrap();
        assert!((n / 5e200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_norm_infinite_elements() {
        let inf = f64::INFINITY;
        assert_eq!(p_norm(&vector(&[inf, inf]), 2.0).unwrap(), inf);
        assert_eq!(p_norm(&vector(&[inf, 1.0, inf]), 2.0).unwrap(), inf);
        assert_eq!(p_norm(&vector(&[-inf, 2.0]), 2.0).unwrap(), inf);
        assert!(p_norm(&vector(&[inf, f64::NAN]), 2.0).unwrap().is_nan());
    }

    #[test]
    fn test_two_norm_repeated_values() {
        let n = p_norm(&vector(&[2.0, 2.0, 2.0, 2.0]), 2.0).unwrap();
        assert_eq!(n, 4.0);
    }

    #[test]
    fn test_one_and_general_norms() {
        let t = vector(&[1.0, -2.0, 2.0]);
        assert_eq!(p_norm(&t, 1.0).unwrap(), 5.0);
        assert!((p_norm(&t, 2.0).unwrap() - 3.0).abs() < 1e-12);
        assert!((p_norm(&t, 3.0).unwrap() - 17f64.cbrt()).abs() < 1e-12);
        assert_eq!(p_norm(&t, f64::INFINITY).unwrap(), 2.0);
    }

    #[test]
    fn test_norm_of_strided_view() {
        let t = Tensor::from_vec(Shape::matrix(2, 2), vec![3.0, 100.0, 4.0, 100.0]).unwrap();
        let col = t.select(1, 0).unwrap();
        assert_eq!(p_norm(&col, 2.0).unwrap(), 5.0);
    }

    #[test]
    fn test_invalid_p() {
        let t = vector(&[1.0]);
        for p in [0.0, -1.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                p_norm(&t, p),
                Err(TensorError::InvalidArgument { op: "p_norm", .. })
            ));
        }
    }

    #[test]
    fn test_empty_tensor() {
        assert_eq!(p_norm(&Tensor::new_empty(), 2.0).unwrap(), 0.0);
        assert_eq!(sum(&Tensor::new_empty()), 0.0);
    }

    #[test]
    fn test_sum() {
        let t = vector(&[0.5, 1.5, -1.0]);
        assert_eq!(sum(&t), 1.0);
    }
}
