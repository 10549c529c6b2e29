// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dense-memory
//!
//! Budget accounting for dense tensor storage.
//!
//! # Key Components
//!
//! - [`MemoryBudget`] — a hard memory ceiling with human-readable parsing
//!   (`"512M"`, `"1G"`, etc.).
//! - [`MemoryLedger`] — enforces the budget and tracks live bytes and
//!   statistics. Cheap to clone; clones share one account.
//! - [`Reservation`] — an RAII guard over reserved bytes. Dropping it
//!   returns the bytes to the ledger.
//! - [`AllocationStats`] — cumulative metrics (peak usage, OOM count).
//!
//! # Ownership Model
//!
//! ```text
//! MemoryLedger::reserve(bytes)
//!       │
//!       ▼
//!   Reservation  ◄─── held by a tensor Storage, holds Arc<LedgerInner>
//!       │
//!       │  drop() (last Storage handle gone)
//!       ▼
//!   LedgerInner::release()  ──► reserved_bytes -= bytes
//! ```

mod budget;
mod error;
mod guard;
mod ledger;
mod stats;

pub use budget::MemoryBudget;
pub use error::MemoryError;
pub use guard::Reservation;
pub use ledger::MemoryLedger;
pub use stats::AllocationStats;
