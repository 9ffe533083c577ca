use serde::{Deserialize, Serialize};

use crate::diagnostics::SkipReason;

/// Row accounting for one run. Shard partials fold together with [`add`],
/// saturating on overflow so the merge stays order-independent.
///
/// [`add`]: RunStats::add
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Lines fed to the mapper.
    pub rows: u64,
    /// Pairs emitted to the aggregator.
    pub emitted: u64,
    pub insufficient_fields: u64,
    pub empty_fields: u64,
    pub malformed_dates: u64,
    pub malformed_counts: u64,
}

impl RunStats {
    pub const ZERO: Self = RunStats {
        rows: 0,
        emitted: 0,
        insufficient_fields: 0,
        empty_fields: 0,
        malformed_dates: 0,
        malformed_counts: 0,
    };

    /// Fold another shard's counters into `self`.
    pub fn add(&mut self, other: RunStats) {
        self.rows = self.rows.saturating_add(other.rows);
        self.emitted = self.emitted.saturating_add(other.emitted);
        self.insufficient_fields = self
            .insufficient_fields
            .saturating_add(other.insufficient_fields);
        self.empty_fields = self.empty_fields.saturating_add(other.empty_fields);
        self.malformed_dates = self.malformed_dates.saturating_add(other.malformed_dates);
        self.malformed_counts = self.malformed_counts.saturating_add(other.malformed_counts);
    }

    /// Count one dropped record under its reason.
    pub fn note_skip(&mut self, reason: SkipReason) {
        let slot = match reason {
            SkipReason::InsufficientFields => &mut self.insufficient_fields,
            SkipReason::EmptyField => &mut self.empty_fields,
            SkipReason::MalformedDate => &mut self.malformed_dates,
            SkipReason::MalformedCount => &mut self.malformed_counts,
        };
        *slot = slot.saturating_add(1);
    }

    /// Total rows dropped before aggregation.
    pub fn skipped(&self) -> u64 {
        self.insufficient_fields
            .saturating_add(self.empty_fields)
            .saturating_add(self.malformed_dates)
            .saturating_add(self.malformed_counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_folds_counter_wise() {
        let mut a = RunStats {
            rows: 10,
            emitted: 7,
            insufficient_fields: 1,
            empty_fields: 1,
            malformed_dates: 1,
            malformed_counts: 0,
        };
        let b = RunStats {
            rows: 4,
            emitted: 4,
            ..RunStats::ZERO
        };
        a.add(b);
        assert_eq!(a.rows, 14);
        assert_eq!(a.emitted, 11);
        assert_eq!(a.skipped(), 3);
    }

    #[test]
    fn note_skip_buckets_by_reason() {
        let mut stats = RunStats::ZERO;
        stats.note_skip(SkipReason::InsufficientFields);
        stats.note_skip(SkipReason::MalformedDate);
        stats.note_skip(SkipReason::MalformedDate);
        assert_eq!(stats.insufficient_fields, 1);
        assert_eq!(stats.malformed_dates, 2);
        assert_eq!(stats.skipped(), 3);
    }
}
