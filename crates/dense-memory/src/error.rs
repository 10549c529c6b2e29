// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for storage budget accounting.

/// Errors that can occur while reserving or allocating storage memory.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The requested reservation would exceed the memory budget.
    #[error("out of memory: requested {requested_bytes} bytes, but only {available_bytes} available (budget: {budget_bytes})")]
    OutOfMemory {
        requested_bytes: usize,
        available_bytes: usize,
        budget_bytes: usize,
    },

    /// The system allocator refused the request.
    #[error("system allocator could not provide {requested_bytes} bytes")]
    SystemAllocation { requested_bytes: usize },

    /// An element count whose byte size does not fit in `usize`.
    #[error("allocation size overflow: {elements} elements of {element_bytes} bytes")]
    SizeOverflow { elements: usize, element_bytes: usize },

    /// A budget string or value that cannot be used as a ceiling.
    #[error("invalid memory budget: {0}")]
    InvalidBudget(String),
}
