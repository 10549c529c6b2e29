// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reservation statistics for profiling and diagnostics.

/// Cumulative statistics about ledger usage.
///
/// Useful for sizing the budget of a benchmark run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AllocationStats {
    /// Number of successful non-empty reservations.
    pub total_reservations: u64,
    /// Number of reservations returned to the ledger.
    pub total_releases: u64,
    /// Number of reservation requests refused by the budget.
    pub oom_count: u64,
    /// High-water mark of reserved bytes.
    pub peak_reserved_bytes: usize,
    /// Total bytes ever reserved (including released ones).
    pub cumulative_reserved_bytes: u64,
}

impl AllocationStats {
    pub(crate) fn record_reservation(&mut self, size: usize) {
        self.total_reservations += 1;
        self.cumulative_reserved_bytes += size as u64;
    }

    pub(crate) fn record_release(&mut self) {
        self.total_releases += 1;
    }

    pub(crate) fn record_oom(&mut self) {
        self.oom_count += 1;
    }

    /// Updates the peak high-water mark if needed.
    pub(crate) fn update_peak(&mut self, current_bytes: usize) {
        if current_bytes > self.peak_reserved_bytes {
            self.peak_reserved_bytes = current_bytes;
        }
    }

    /// Number of reservations still live.
    pub fn live_reservations(&self) -> u64 {
        self.total_reservations.saturating_sub(self.total_releases)
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let peak_mb = self.peak_reserved_bytes as f64 / (1024.0 * 1024.0);
        format!(
            "Reservations: {} total ({} released, {} live), {} OOMs, peak {:.2} MB",
            self.total_reservations,
            self.total_releases,
            self.live_reservations(),
            self.oom_count,
            peak_mb,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = AllocationStats::default();
        assert_eq!(s.total_reservations, 0);
        assert_eq!(s.live_reservations(), 0);
    }

    #[test]
    fn test_peak_tracking() {
        let mut s = AllocationStats::default();
        s.update_peak(100);
        assert_eq!(s.peak_reserved_bytes, 100);
        s.update_peak(50);
        assert_eq!(s.peak_reserved_bytes, 100); // Doesn't decrease.
        s.update_peak(200);
        assert_eq!(s.peak_reserved_bytes, 200);
    }

    #[test]
    fn test_cumulative_bytes() {
        let mut s = AllocationStats::default();
        s.record_reservation(1000);
        s.record_reservation(500);
        s.record_release();
        assert_eq!(s.cumulative_reserved_bytes, 1500);
        assert_eq!(s.live_reservations(), 1);
    }

    #[test]
    fn test_summary() {
        let mut s = AllocationStats::default();
        s.record_reservation(1024 * 1024);
        s.record_reservation(512 * 1024);
        s.record_release();
        s.record_oom();
        s.update_peak(1024 * 1024 + 512 * 1024);
        let summary = s.summary();
        assert!(summary.contains("2 total"));
        assert!(summary.contains("1 released"));
        assert!(summary.contains("1 OOMs"));
        assert!(summary.contains("peak 1.50 MB"));
    }
}
