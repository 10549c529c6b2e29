// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory budget configuration and parsing.
//!
//! A [`MemoryBudget`] is the hard ceiling a [`crate::MemoryLedger`] enforces
//! on live tensor storage. It supports human-readable string parsing for
//! CLI and config-file ergonomics.

use crate::MemoryError;
use std::fmt;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// A hard memory ceiling for tensor storage.
///
/// # Parsing
/// Supports human-readable strings with binary suffixes:
/// - `"512M"` or `"512MB"` → 512 × 1024² bytes
/// - `"1G"` or `"1GB"` → 1 × 1024³ bytes
/// - `"2048K"` or `"2048KB"` → 2048 × 1024 bytes
/// - `"1073741824"` → raw byte count
///
/// # Examples
/// ```
/// use dense_memory::MemoryBudget;
///
/// let b = MemoryBudget::from_mb(512);
/// assert_eq!(b.as_mb(), 512);
///
/// let b = MemoryBudget::parse("1G").unwrap();
/// assert_eq!(b.as_mb(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryBudget {
    /// Budget in bytes.
    bytes: usize,
}

impl MemoryBudget {
    /// Creates a budget from a byte count.
    pub fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Creates a budget from kilobytes. Sizes past `usize::MAX` bytes
    /// saturate, as do the other unit constructors.
    pub fn from_kb(kb: usize) -> Self {
        Self {
            bytes: kb.saturating_mul(KB),
        }
    }

    /// Creates a budget from megabytes.
    pub fn from_mb(mb: usize) -> Self {
        Self {
            bytes: mb.saturating_mul(MB),
        }
    }

    /// Creates a budget from gigabytes.
    pub fn from_gb(gb: usize) -> Self {
        Self {
            bytes: gb.saturating_mul(GB),
        }
    }

    /// Returns the budget in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Returns the budget in megabytes (truncated).
    pub fn as_mb(&self) -> usize {
        self.bytes / MB
    }

    /// Parses a human-readable budget string.
    ///
    /// Accepted formats: `"512M"`, `"512MB"`, `"1G"`, `"1GB"`, `"2048K"`,
    /// `"2048KB"`, `"100B"`, or a plain byte count like `"1073741824"`.
    /// Case-insensitive. Zero budgets are rejected.
    pub fn parse(s: &str) -> Result<Self, MemoryError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MemoryError::InvalidBudget("empty budget string".into()));
        }

        let upper = s.to_ascii_uppercase();
        let suffixes = [
            ("GB", GB),
            ("G", GB),
            ("MB", MB),
            ("M", MB),
            ("KB", KB),
            ("K", KB),
            ("B", 1),
        ];
        let (num_str, multiplier) = suffixes
            .iter()
            .find(|(suffix, _)| upper.ends_with(suffix))
            .map(|(suffix, mult)| (&s[..s.len() - suffix.len()], *mult))
            .unwrap_or((s, 1));

        let value: usize = num_str.trim().parse().map_err(|_| {
            MemoryError::InvalidBudget(format!(
                "'{s}': expected a number followed by an optional suffix (K, M, G)"
            ))
        })?;

        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| MemoryError::InvalidBudget(format!("'{s}' overflows usize")))?;

        if bytes == 0 {
            return Err(MemoryError::InvalidBudget(format!("'{s}' is zero")));
        }

        Ok(Self { bytes })
    }
}

impl fmt::Display for MemoryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes >= GB && self.bytes % GB == 0 {
            write!(f, "{} GB", self.bytes / GB)
        } else if self.bytes >= MB && self.bytes % MB == 0 {
            write!(f, "{} MB", self.bytes / MB)
        } else if self.bytes >= KB && self.bytes % KB == 0 {
            write!(f, "{} KB", self.bytes / KB)
        } else {
            write!(f, "{} B", self.bytes)
        }
    }
}

impl std::str::FromStr for MemoryBudget {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
