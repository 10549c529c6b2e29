// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII reservation that returns its bytes to the ledger on drop.
//!
//! A [`Reservation`] is held by a tensor storage for as long as the storage
//! lives. Because it is released in `Drop` and cannot be cloned, every
//! reserved byte is returned exactly once, on every exit path.

use crate::ledger::LedgerInner;
use std::sync::Arc;

/// An RAII guard over bytes charged to a [`MemoryLedger`](crate::MemoryLedger).
///
/// # Example
/// ```
/// use dense_memory::{MemoryBudget, MemoryLedger};
///
/// let ledger = MemoryLedger::new(MemoryBudget::from_kb(4));
/// let r = ledger.reserve(1024).unwrap();
/// assert_eq!(ledger.reserved_bytes(), 1024);
/// drop(r);
/// assert_eq!(ledger.reserved_bytes(), 0);
/// ```
pub struct Reservation {
    /// Handle back to the ledger for release accounting.
    ledger: Arc<LedgerInner>,
    /// Size of this reservation in bytes.
    size_bytes: usize,
}

impl Reservation {
    pub(crate) fn new(ledger: Arc<LedgerInner>, size_bytes: usize) -> Self {
        Self { ledger, size_bytes }
    }

    /// Returns the size of this reservation in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.ledger.release(self.size_bytes);
    }
}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}
