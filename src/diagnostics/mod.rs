use tracing::{debug, warn};

/// Why the extractor dropped a record instead of emitting a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Fewer than the minimum number of CSV fields.
    InsufficientFields,
    /// Date or aboard field present but empty.
    EmptyField,
    /// Date carried no usable year segment.
    MalformedDate,
    /// Aboard field did not parse as an integer (lenient policy only).
    MalformedCount,
}

/// Side channel for informational output from the mapping and reduction
/// stages. Implementations are shared across worker threads.
pub trait Diagnostics: Send + Sync {
    /// A record was dropped before emitting a pair.
    fn skipped(&self, reason: SkipReason, raw_line: &str);

    /// A year's total was finalized on its way to the output sink.
    fn finalized(&self, year: &str, total: i64);
}

/// Default sink: forwards skips to `warn!` and finalized totals to `debug!`.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn skipped(&self, reason: SkipReason, raw_line: &str) {
        match reason {
            SkipReason::InsufficientFields => {
                warn!(line = %raw_line, "record has insufficient fields")
            }
            SkipReason::EmptyField => warn!(line = %raw_line, "skipping record"),
            SkipReason::MalformedDate => {
                warn!(line = %raw_line, "skipping record with unusable date")
            }
            SkipReason::MalformedCount => {
                warn!(line = %raw_line, "skipping record with non-numeric aboard count")
            }
        }
    }

    fn finalized(&self, year: &str, total: i64) {
        debug!(year = %year, total, "year finalized");
    }
}

/// Drops everything; for callers that only want the totals.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn skipped(&self, _reason: SkipReason, _raw_line: &str) {}

    fn finalized(&self, _year: &str, _total: i64) {}
}
