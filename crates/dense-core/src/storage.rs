// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference-counted flat element buffers.
//!
//! A [`Storage`] is the unit of raw memory ownership. Tensors hold a
//! handle to one; cloning the handle shares the buffer, and the buffer
//! (together with any budget [`Reservation`]) is freed when the last
//! handle drops.
//!
//! Elements are `Cell<f64>`, so two tensors viewing the same buffer can
//! read and write it through shared references. The handle is `Rc`, which
//! keeps a storage on one thread: `Storage` is neither `Send` nor `Sync`.

use crate::TensorError;
use dense_memory::{MemoryError, MemoryLedger, Reservation};
use std::cell::Cell;
use std::rc::Rc;

const ELEMENT_BYTES: usize = std::mem::size_of::<f64>();

struct StorageInner {
    data: Box<[Cell<f64>]>,
    /// Budget charge, returned when the buffer is freed.
    _reservation: Option<Reservation>,
}

impl Drop for StorageInner {
    fn drop(&mut self) {
        tracing::debug!(len = self.data.len(), "storage freed");
    }
}

/// A shared handle to a fixed-size buffer of `f64` elements.
///
/// # Example
/// ```
/// use dense_core::Storage;
///
/// let a = Storage::new(4).unwrap();
/// let b = a.clone();
/// b.set(2, 7.5).unwrap();
/// assert_eq!(a.get(2).unwrap(), 7.5);
/// assert_eq!(a.handle_count(), 2);
/// b.release();
/// assert_eq!(a.handle_count(), 1);
/// ```
#[derive(Clone)]
pub struct Storage {
    inner: Rc<StorageInner>,
}

impl Storage {
    /// Allocates a zero-filled buffer of `len` elements.
    ///
    /// # Errors
    /// [`TensorError::Allocation`] if the byte size overflows or the system
    /// allocator refuses the request.
    pub fn new(len: usize) -> Result<Self, TensorError> {
        Self::allocate(len, None)
    }

    /// Allocates a zero-filled buffer of `len` elements charged to `ledger`.
    ///
    /// The charge is taken before the buffer is allocated and is returned
    /// when the last handle drops, or immediately if allocation fails.
    pub fn new_in(ledger: &MemoryLedger, len: usize) -> Result<Self, TensorError> {
        let reservation = ledger.reserve(byte_size(len)?)?;
        Self::allocate(len, Some(reservation))
    }

    /// Adopts an existing vector as an unbudgeted buffer.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self::from_cells(values.into_iter().map(Cell::new).collect(), None)
    }

    fn allocate(len: usize, reservation: Option<Reservation>) -> Result<Self, TensorError> {
        let requested_bytes = byte_size(len)?;
        let mut data: Vec<Cell<f64>> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MemoryError::SystemAllocation { requested_bytes })?;
        data.resize_with(len, || Cell::new(0.0));
        Ok(Self::from_cells(data.into_boxed_slice(), reservation))
    }

    fn from_cells(data: Box<[Cell<f64>]>, reservation: Option<Reservation>) -> Self {
        tracing::debug!(
            len = data.len(),
            budgeted = reservation.is_some(),
            "storage allocated"
        );
        Self {
            inner: Rc::new(StorageInner {
                data,
                _reservation: reservation,
            }),
        }
    }

    /// Number of elements in the buffer. Fixed for the storage's lifetime.
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Reads the element at flat position `index`.
    ///
    /// # Errors
    /// [`TensorError::InvalidArgument`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<f64, TensorError> {
        self.cell("Storage::get", index).map(Cell::get)
    }

    /// Writes the element at flat position `index`.
    ///
    /// # Errors
    /// [`TensorError::InvalidArgument`] if `index >= len()`.
    pub fn set(&self, index: usize, value: f64) -> Result<(), TensorError> {
        self.cell("Storage::set", index)?.set(value);
        Ok(())
    }

    fn cell(&self, op: &'static str, index: usize) -> Result<&Cell<f64>, TensorError> {
        self.inner
            .data
            .get(index)
            .ok_or_else(|| TensorError::InvalidArgument {
                op,
                detail: format!("index {index} out of range for length {}", self.len()),
            })
    }

    /// Copies the buffer out in flat order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.inner.data.iter().map(Cell::get).collect()
    }

    /// Number of live handles (tensors and explicit holders) sharing this buffer.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Returns `true` if both handles refer to the same buffer.
    pub fn ptr_eq(a: &Storage, b: &Storage) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Gives up this handle. The buffer is freed if it was the last one.
    pub fn release(self) {
        drop(self);
    }

    pub(crate) fn cells(&self) -> &[Cell<f64>] {
        &self.inner.data
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.len())
            .field("handles", &self.handle_count())
            .finish()
    }
}

fn byte_size(len: usize) -> Result<usize, MemoryError> {
    len.checked_mul(ELEMENT_BYTES)
        .ok_or(MemoryError::SizeOverflow {
            elements: len,
            element_bytes: ELEMENT_BYTES,
        })
}
