// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Strided tensor views over shared storage.

use crate::ops::walk::for_each_position;
use crate::{Shape, Storage, TensorError};
use dense_memory::MemoryLedger;
use std::cell::Cell;

/// A logical n-dimensional array described as `(storage, sizes, strides, offset)`.
///
/// The flat position of a multi-index `idx` is
/// `offset + Σ idx[i] * strides[i]`, and every valid multi-index maps
/// inside the storage. Several tensors may view one [`Storage`]; writes
/// through one are visible through the others at overlapping positions.
///
/// A tensor does not own its buffer. It holds one storage handle, and the
/// buffer lives as long as the longest-lived handle.
///
/// # Memory Layout
/// [`with_size`](Tensor::with_size) produces row-major (C order) strides.
/// Views made by [`narrow`](Tensor::narrow), [`select`](Tensor::select)
/// and [`transpose`](Tensor::transpose) share the storage and are usually
/// non-contiguous.
pub struct Tensor {
    storage: Option<Storage>,
    sizes: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
}

impl Tensor {
    /// Creates a zero-dimensional tensor with no backing storage.
    pub fn new_empty() -> Self {
        Self {
            storage: None,
            sizes: Vec::new(),
            strides: Vec::new(),
            offset: 0,
        }
    }

    /// Allocates a fresh zero-filled storage for `shape` and views it with
    /// row-major strides.
    ///
    /// # Examples
    /// ```
    /// use dense_core::{Shape, Tensor};
    /// let t = Tensor::with_size(&Shape::matrix(2, 3)).unwrap();
    /// assert_eq!(t.strides(), &[3, 1]);
    /// assert_eq!(t.element_count(), 6);
    /// ```
    pub fn with_size(shape: &Shape) -> Result<Self, TensorError> {
        let count = shape.checked_num_elements()?;
        Ok(Self::contiguous(Storage::new(count)?, shape))
    }

    /// Like [`with_size`](Tensor::with_size), with the storage charged to `ledger`.
    pub fn with_size_in(shape: &Shape, ledger: &MemoryLedger) -> Result<Self, TensorError> {
        let count = shape.checked_num_elements()?;
        Ok(Self::contiguous(Storage::new_in(ledger, count)?, shape))
    }

    /// Builds a contiguous tensor from row-major `values`.
    ///
    /// ```
    /// use dense_core::{Shape, Tensor};
    /// let t = Tensor::from_vec(Shape::vector(3), vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
    /// ```
    pub fn from_vec(shape: Shape, values: Vec<f64>) -> Result<Self, TensorError> {
        let expected = shape.checked_num_elements()?;
        if values.len() != expected {
            return Err(TensorError::InvalidShape(format!(
                "{shape} needs {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self::contiguous(Storage::from_vec(values), &shape))
    }

    /// Views an existing storage with explicit geometry.
    ///
    /// # Errors
    /// [`TensorError::InvalidShape`] if `sizes` and `strides` differ in rank
    /// or some valid multi-index would fall outside the storage.
    pub fn from_storage(
        storage: Storage,
        offset: usize,
        sizes: Vec<usize>,
        strides: Vec<usize>,
    ) -> Result<Self, TensorError> {
        if sizes.len() != strides.len() {
            return Err(TensorError::InvalidShape(format!(
                "{} sizes but {} strides",
                sizes.len(),
                strides.len()
            )));
        }
        if let Some(last) = last_position(offset, &sizes, &strides)? {
            if last >= storage.len() {
                return Err(TensorError::InvalidShape(format!(
                    "view reaches position {last} of a storage with {} elements",
                    storage.len()
                )));
            }
        }
        Ok(Self {
            storage: Some(storage),
            sizes,
            strides,
            offset,
        })
    }

    fn contiguous(storage: Storage, shape: &Shape) -> Self {
        Self {
            storage: Some(storage),
            sizes: shape.dims().to_vec(),
            strides: shape.strides(),
            offset: 0,
        }
    }

    /// Per-dimension extents.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Per-dimension element steps.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Flat position of the first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    /// The tensor's extents as a [`Shape`].
    pub fn shape(&self) -> Shape {
        Shape::new(self.sizes.clone())
    }

    /// The backing storage, `None` for [`new_empty`](Tensor::new_empty).
    pub fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    /// `∏ sizes[i]`, and 0 for a zero-dimensional tensor.
    pub fn element_count(&self) -> usize {
        if self.sizes.is_empty() {
            0
        } else {
            self.sizes.iter().product()
        }
    }

    /// Returns `true` if the strides are row-major for the sizes.
    /// Extent-1 dimensions are ignored.
    pub fn is_contiguous(&self) -> bool {
        is_row_major(&self.sizes, &self.strides)
    }

    /// Returns `true` if both tensors view the same storage.
    pub fn shares_storage(&self, other: &Tensor) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => Storage::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Reads the element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<f64, TensorError> {
        let pos = self.position(index)?;
        Ok(self.cells()[pos].get())
    }

    /// Writes the element at a multi-index through the shared storage.
    pub fn set(&self, index: &[usize], value: f64) -> Result<(), TensorError> {
        let pos = self.position(index)?;
        self.cells()[pos].set(value);
        Ok(())
    }

    /// Copies the logical elements out in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        let cells = self.cells();
        let mut out = Vec::with_capacity(self.element_count());
        for_each_position(&self.sizes, [self], |[p]| out.push(cells[p].get()));
        out
    }

    /// Another handle on exactly this view.
    pub fn alias(&self) -> Tensor {
        Self {
            storage: self.storage.clone(),
            sizes: self.sizes.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }

    /// Restricts dimension `dim` to `start..start + len`, sharing the storage.
    pub fn narrow(&self, dim: usize, start: usize, len: usize) -> Result<Tensor, TensorError> {
        self.check_dim("narrow", dim)?;
        let end = start.checked_add(len);
        if end.map_or(true, |end| end > self.sizes[dim]) {
            return Err(TensorError::InvalidShape(format!(
                "narrow {start}..{start}+{len} exceeds extent {} of dimension {dim}",
                self.sizes[dim]
            )));
        }
        let mut view = self.alias();
        if len > 0 {
            view.offset += start * self.strides[dim];
        }
        view.sizes[dim] = len;
        Ok(view)
    }

    /// Fixes dimension `dim` at `index`, dropping that dimension.
    pub fn select(&self, dim: usize, index: usize) -> Result<Tensor, TensorError> {
        self.check_dim("select", dim)?;
        if index >= self.sizes[dim] {
            return Err(TensorError::InvalidShape(format!(
                "select index {index} out of range for extent {} of dimension {dim}",
                self.sizes[dim]
            )));
        }
        let mut view = self.alias();
        view.offset += index * self.strides[dim];
        view.sizes.remove(dim);
        view.strides.remove(dim);
        Ok(view)
    }

    /// Swaps two dimensions, sharing the storage.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Tensor, TensorError> {
        self.check_dim("transpose", dim0)?;
        self.check_dim("transpose", dim1)?;
        let mut view = self.alias();
        view.sizes.swap(dim0, dim1);
        view.strides.swap(dim0, dim1);
        Ok(view)
    }

    /// Copies the logical elements into a new contiguous storage.
    pub fn deep_copy(&self) -> Result<Tensor, TensorError> {
        if self.sizes.is_empty() {
            return Ok(Tensor::new_empty());
        }
        let copy = Tensor::with_size(&self.shape())?;
        crate::ops::copy(&copy, self)?;
        Ok(copy)
    }

    /// Releases this tensor's storage handle.
    pub fn free(self) {
        drop(self);
    }

    pub(crate) fn cells(&self) -> &[Cell<f64>] {
        match &self.storage {
            Some(storage) => storage.cells(),
            None => &[],
        }
    }

    fn check_dim(&self, op: &str, dim: usize) -> Result<(), TensorError> {
        if dim >= self.rank() {
            return Err(TensorError::InvalidShape(format!(
                "{op}: dimension {dim} out of range for rank {}",
                self.rank()
            )));
        }
        Ok(())
    }

    fn position(&self, index: &[usize]) -> Result<usize, TensorError> {
        if index.len() != self.rank() || self.sizes.is_empty() {
            return Err(TensorError::InvalidArgument {
                op: "index",
                detail: format!(
                    "index of rank {} for tensor of rank {}",
                    index.len(),
                    self.rank()
                ),
            });
        }
        let mut pos = self.offset;
        let dims = index.iter().zip(&self.sizes).zip(&self.strides);
        for (dim, ((&i, &size), &stride)) in dims.enumerate() {
            if i >= size {
                return Err(TensorError::InvalidArgument {
                    op: "index",
                    detail: format!("index {i} out of range for extent {size} of dimension {dim}"),
                });
            }
            pos += i * stride;
        }
        Ok(pos)
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("sizes", &self.sizes)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Highest flat position any valid multi-index reaches, or `None` when
/// the view has no elements.
fn last_position(
    offset: usize,
    sizes: &[usize],
    strides: &[usize],
) -> Result<Option<usize>, TensorError> {
    if sizes.is_empty() || sizes.contains(&0) {
        return Ok(None);
    }
    sizes
        .iter()
        .zip(strides)
        .try_fold(offset, |acc, (&size, &stride)| {
            (size - 1)
                .checked_mul(stride)
                .and_then(|span| acc.checked_add(span))
        })
        .map(Some)
        .ok_or_else(|| TensorError::InvalidShape("view extent overflows usize".into()))
}

pub(crate) fn is_row_major(sizes: &[usize], strides: &[usize]) -> bool {
    let mut expected = 1usize;
    for (&size, &stride) in sizes.iter().zip(strides).rev() {
        if size == 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(size);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(rows: usize, cols: usize) -> Tensor {
        let values = (0..rows * cols).map(|v| v as f64).collect();
        Tensor::from_vec(Shape::matrix(rows, cols), values).unwrap()
    }

    #[test]
    fn test_new_empty() {
        let t = Tensor::new_empty();
        assert_eq!(t.rank(), 0);
        assert_eq!(t.element_count(), 0);
        assert!(t.storage().is_none());
        assert!(t.to_vec().is_empty());
    }

    #[test]
    fn test_with_size_row_major() {
        let t = Tensor::with_size(&Shape::new(vec![2, 3, 4])).unwrap();
        assert_eq!(t.strides(), &[12, 4, 1]);
        assert_eq!(t.offset(), 0);
        assert_eq!(t.element_count(), 24);
        assert_eq!(t.storage().unwrap().len(), 24);
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_with_size_in_budget() {
        let ledger = MemoryLedger::new(dense_memory::MemoryBudget::from_bytes(256));
        let t = Tensor::with_size_in(&Shape::matrix(4, 4), &ledger).unwrap();
        assert_eq!(ledger.reserved_bytes(), 128);
        assert!(Tensor::with_size_in(&Shape::matrix(4, 5), &ledger).is_err());
        t.free();
        assert_eq!(ledger.reserved_bytes(), 0);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let result = Tensor::from_vec(Shape::matrix(2, 3), vec![0.0; 5]);
        assert!(matches!(result, Err(TensorError::InvalidShape(_))));
    }

    #[test]
    fn test_from_storage_bounds() {
        let storage = Storage::new(6).unwrap();
        assert!(Tensor::from_storage(storage.clone(), 0, vec![2, 3], vec![3, 1]).is_ok());
        assert!(Tensor::from_storage(storage.clone(), 1, vec![2, 3], vec![3, 1]).is_err());
        assert!(Tensor::from_storage(storage.clone(), 0, vec![2, 3], vec![1]).is_err());
        // No valid index, nothing to check.
        assert!(Tensor::from_storage(storage, 100, vec![0, 3], vec![3, 1]).is_ok());
    }

    #[test]
    fn test_get_set_through_alias() {
        let t = counting(2, 3);
        let a = t.alias();
        a.set(&[1, 2], 42.0).unwrap();
        assert_eq!(t.get(&[1, 2]).unwrap(), 42.0);
        assert!(t.shares_storage(&a));
        assert!(t.get(&[2, 0]).is_err());
        assert!(t.get(&[0]).is_err());
    }

    #[test]
    fn test_transpose_view() {
        let t = counting(2, 3);
        let tt = t.transpose(0, 1).unwrap();
        assert_eq!(tt.sizes(), &[3, 2]);
        assert_eq!(tt.strides(), &[1, 3]);
        assert!(!tt.is_contiguous());
        assert_eq!(tt.to_vec(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_narrow_view() {
        let t = counting(3, 4);
        let n = t.narrow(1, 1, 2).unwrap();
        assert_eq!(n.sizes(), &[3, 2]);
        assert_eq!(n.offset(), 1);
        assert_eq!(n.to_vec(), vec![1.0, 2.0, 5.0, 6.0, 9.0, 10.0]);
        assert!(t.narrow(1, 3, 2).is_err());
        assert!(t.narrow(2, 0, 1).is_err());
        assert_eq!(t.narrow(0, 3, 0).unwrap().element_count(), 0);
    }

    #[test]
    fn test_select_view() {
        let t = counting(3, 4);
        let row = t.select(0, 2).unwrap();
        assert_eq!(row.sizes(), &[4]);
        assert_eq!(row.to_vec(), vec![8.0, 9.0, 10.0, 11.0]);
        let col = t.select(1, 1).unwrap();
        assert_eq!(col.strides(), &[4]);
        assert_eq!(col.to_vec(), vec![1.0, 5.0, 9.0]);
        assert!(t.select(0, 3).is_err());
    }

    #[test]
    fn test_deep_copy_is_contiguous_and_detached() {
        let t = counting(2, 3);
        let copy = t.transpose(0, 1).unwrap().deep_copy().unwrap();
        assert!(copy.is_contiguous());
        assert!(!copy.shares_storage(&t));
        assert_eq!(copy.to_vec(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        t.set(&[0, 0], -1.0).unwrap();
        assert_eq!(copy.get(&[0, 0]).unwrap(), 0.0);
    }

    #[test]
    fn test_free_releases_handle() {
        let t = counting(2, 2);
        let storage = t.storage().unwrap().clone();
        assert_eq!(storage.handle_count(), 2);
        t.free();
        assert_eq!(storage.handle_count(), 1);
    }

    #[test]
    fn test_is_row_major_ignores_unit_dims() {
        assert!(is_row_major(&[1, 4], &[99, 1]));
        assert!(is_row_major(&[2, 1, 3], &[3, 7, 1]));
        assert!(!is_row_major(&[2, 3], &[1, 2]));
    }
}
