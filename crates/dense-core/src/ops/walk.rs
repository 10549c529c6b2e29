// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row-major traversal of several same-sized tensors at once.
//!
//! Every kernel in this crate is a closure over flat storage positions;
//! this module turns the shared logical multi-index into one position per
//! operand, each computed from that operand's own offset and strides.

use crate::tensor::is_row_major;
use crate::Tensor;
use std::array;

/// Calls `visit` once per logical position of `sizes`, last dimension
/// fastest, with the flat storage position of each operand.
///
/// All operands must have extents equal to `sizes`; callers validate this
/// before any visit. Positions are produced one at a time, so a closure
/// that reads its inputs before writing its output never sees a value
/// already overwritten at that same position.
pub(crate) fn for_each_position<const N: usize>(
    sizes: &[usize],
    operands: [&Tensor; N],
    mut visit: impl FnMut([usize; N]),
) {
    if sizes.is_empty() || sizes.contains(&0) {
        return;
    }

    let offsets: [usize; N] = array::from_fn(|k| operands[k].offset());

    if operands.iter().all(|t| is_row_major(sizes, t.strides())) {
        let count: usize = sizes.iter().product();
        for i in 0..count {
            visit(array::from_fn(|k| offsets[k] + i));
        }
        return;
    }

    let inner = sizes.len() - 1;
    let inner_len = sizes[inner];
    let inner_strides: [usize; N] = array::from_fn(|k| operands[k].strides()[inner]);
    let mut counter = vec![0usize; inner];
    let mut base = offsets;

    loop {
        for j in 0..inner_len {
            visit(array::from_fn(|k| base[k] + j * inner_strides[k]));
        }

        // Odometer over the outer dimensions.
        let mut dim = inner;
        loop {
            if dim == 0 {
                return;
            }
            dim -= 1;
            counter[dim] += 1;
            if counter[dim] < sizes[dim] {
                for k in 0..N {
                    base[k] += operands[k].strides()[dim];
                }
                break;
            }
            for k in 0..N {
                base[k] -= operands[k].strides()[dim] * (sizes[dim] - 1);
            }
            counter[dim] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shape, Storage};

    fn positions(t: &Tensor) -> Vec<usize> {
        let mut out = Vec::new();
        for_each_position(t.sizes(), [t], |[p]| out.push(p));
        out
    }

    #[test]
    fn test_contiguous_positions() {
        let t = Tensor::with_size(&Shape::matrix(2, 3)).unwrap();
        assert_eq!(positions(&t), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transposed_positions() {
        let t = Tensor::with_size(&Shape::matrix(2, 3)).unwrap();
        let tt = t.transpose(0, 1).unwrap();
        assert_eq!(positions(&tt), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_offset_and_3d_strides() {
        let storage = Storage::new(40).unwrap();
        let t = Tensor::from_storage(storage, 5, vec![2, 2, 2], vec![20, 1, 10]).unwrap();
        assert_eq!(positions(&t), vec![5, 15, 6, 16, 25, 35, 26, 36]);
    }

    #[test]
    fn test_mixed_operands_share_logical_index() {
        let a = Tensor::with_size(&Shape::matrix(2, 2)).unwrap();
        let b = Tensor::with_size(&Shape::matrix(2, 2)).unwrap();
        let bt = b.transpose(0, 1).unwrap();
        let mut pairs = Vec::new();
        for_each_position(a.sizes(), [&a, &bt], |[p, q]| pairs.push((p, q)));
        assert_eq!(pairs, vec![(0, 0), (1, 2), (2, 1), (3, 3)]);
    }

    #[test]
    fn test_empty_extents_visit_nothing() {
        let t = Tensor::with_size(&Shape::matrix(0, 3)).unwrap();
        assert!(positions(&t).is_empty());
        assert!(positions(&Tensor::new_empty()).is_empty());
    }
}
