// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Budget-enforcing ledger for tensor storage.
//!
//! The [`MemoryLedger`] does not hand out memory itself; storages allocate
//! their own element buffers and charge the byte size here first. It:
//!
//! 1. Enforces a hard memory ceiling: reservations that would exceed the
//!    budget return `Err(OutOfMemory)` before any buffer is allocated.
//! 2. Tracks live bytes, returned automatically when a [`Reservation`]
//!    drops.
//! 3. Tracks allocation statistics for profiling.
//!
//! # Thread Safety
//! `MemoryLedger` is `Send + Sync`; the counters are atomics and the stats
//! sit behind a `Mutex`. Storages themselves are single-threaded, but
//! several threads may each build their own storages against one ledger.

use crate::{AllocationStats, MemoryBudget, MemoryError, Reservation};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Internal ledger state, shared between the ledger and its reservations.
pub(crate) struct LedgerInner {
    budget: MemoryBudget,
    /// Currently reserved bytes (live, not yet released).
    reserved_bytes: AtomicUsize,
    stats: Mutex<AllocationStats>,
}

impl LedgerInner {
    /// Called by `Reservation::drop`.
    pub(crate) fn release(&self, size_bytes: usize) {
        if size_bytes == 0 {
            return;
        }
        self.reserved_bytes.fetch_sub(size_bytes, Ordering::AcqRel);
        self.lock_stats().record_release();
        tracing::trace!(size_bytes, "reservation released");
    }

    /// Stats survive a panic in another holder; the counters stay usable.
    fn lock_stats(&self) -> MutexGuard<'_, AllocationStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Accounts live storage bytes against a [`MemoryBudget`].
///
/// # Example
/// ```
/// use dense_memory::{MemoryBudget, MemoryLedger};
///
/// let ledger = MemoryLedger::new(MemoryBudget::from_mb(1));
/// let a = ledger.reserve(512 * 1024).unwrap();
/// let b = ledger.reserve(512 * 1024).unwrap();
/// assert!(ledger.reserve(1).is_err());
///
/// drop(a);
/// assert_eq!(ledger.available_bytes(), 512 * 1024);
/// # drop(b);
/// ```
#[derive(Clone)]
pub struct MemoryLedger {
    inner: Arc<LedgerInner>,
}

impl MemoryLedger {
    /// Creates a new ledger with the given budget.
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                budget,
                reserved_bytes: AtomicUsize::new(0),
                stats: Mutex::new(AllocationStats::default()),
            }),
        }
    }

    /// Reserves `size_bytes` against the budget.
    ///
    /// Zero-byte reservations always succeed and are not counted in the
    /// statistics, so empty tensors never fail.
    pub fn reserve(&self, size_bytes: usize) -> Result<Reservation, MemoryError> {
        if size_bytes == 0 {
            return Ok(Reservation::new(Arc::clone(&self.inner), 0));
        }

        let budget = self.inner.budget.as_bytes();
        let claimed = self
            .inner
            .reserved_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current
                    .checked_add(size_bytes)
                    .filter(|&next| next <= budget)
            });

        match claimed {
            Ok(previous) => {
                let mut stats = self.inner.lock_stats();
                stats.record_reservation(size_bytes);
                stats.update_peak(previous + size_bytes);
                Ok(Reservation::new(Arc::clone(&self.inner), size_bytes))
            }
            Err(current) => {
                self.inner.lock_stats().record_oom();
                tracing::warn!(
                    requested = size_bytes,
                    reserved = current,
                    budget = %self.inner.budget,
                    "storage reservation refused"
                );
                Err(MemoryError::OutOfMemory {
                    requested_bytes: size_bytes,
                    available_bytes: budget.saturating_sub(current),
                    budget_bytes: budget,
                })
            }
        }
    }

    /// Returns the number of bytes currently reserved.
    pub fn reserved_bytes(&self) -> usize {
        self.inner.reserved_bytes.load(Ordering::Acquire)
    }

    /// Returns the number of bytes remaining before hitting the budget.
    pub fn available_bytes(&self) -> usize {
        self.inner
            .budget
            .as_bytes()
            .saturating_sub(self.reserved_bytes())
    }

    /// Returns the memory budget.
    pub fn budget(&self) -> MemoryBudget {
        self.inner.budget
    }

    /// Returns a snapshot of allocation statistics.
    pub fn stats(&self) -> AllocationStats {
        self.inner.lock_stats().clone()
    }
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("budget", &self.inner.budget)
            .field("reserved_bytes", &self.reserved_bytes())
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
