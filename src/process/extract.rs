use std::num::ParseIntError;

use thiserror::Error;

use crate::diagnostics::{Diagnostics, SkipReason};
use crate::process::tokenize::split_csv_line;

/// Minimum field count for a record to be considered at all.
pub const MIN_FIELDS: usize = 13;
/// Zero-based position of the crash date (`MM/DD/YYYY`).
pub const DATE_FIELD: usize = 0;
/// Zero-based position of the people-aboard count.
pub const ABOARD_FIELD: usize = 9;

/// One emitted pair: the crash year and the people aboard for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCount {
    pub year: String,
    pub count: i64,
}

/// What to do with a record whose aboard field is not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AboardPolicy {
    /// Fail the run with [`ExtractError::MalformedCount`].
    #[default]
    Abort,
    /// Drop the record and report it through the diagnostics channel.
    SkipAndLog,
}

/// Per-record handling knobs. The defaults reproduce the job's observed
/// behavior: bad counts abort the run and short dates are dropped without a
/// diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractPolicy {
    pub on_malformed_count: AboardPolicy,
    /// Report malformed-date skips instead of dropping them silently.
    pub log_malformed_dates: bool,
}

/// Fatal mapping failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("aboard count `{value}` is not an integer in record: {line}")]
    MalformedCount {
        value: String,
        line: String,
        #[source]
        source: ParseIntError,
    },
}

/// Outcome of mapping one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Emitted(YearCount),
    Skipped(SkipReason),
}

/// Maps tokenized records to `(year, count)` pairs. Stateless: every call
/// returns freshly built values, so one extractor can serve all worker
/// threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    policy: ExtractPolicy,
}

impl Extractor {
    pub fn new(policy: ExtractPolicy) -> Self {
        Self { policy }
    }

    /// Tokenize `line` and extract from the resulting fields.
    pub fn extract_line(
        &self,
        line: &str,
        diag: &dyn Diagnostics,
    ) -> Result<Extraction, ExtractError> {
        self.extract(&split_csv_line(line), line, diag)
    }

    /// Extract a `(year, count)` pair from one record's fields.
    ///
    /// Checks run in a fixed order: field count, emptiness, date shape,
    /// aboard parse. The first three recover by skipping (the date check
    /// silently, unless the policy says otherwise), while a failed parse is
    /// fatal under the default policy.
    pub fn extract(
        &self,
        fields: &[String],
        raw_line: &str,
        diag: &dyn Diagnostics,
    ) -> Result<Extraction, ExtractError> {
        if fields.len() < MIN_FIELDS {
            diag.skipped(SkipReason::InsufficientFields, raw_line);
            return Ok(Extraction::Skipped(SkipReason::InsufficientFields));
        }

        let date = &fields[DATE_FIELD];
        let aboard = &fields[ABOARD_FIELD];
        if date.is_empty() || aboard.is_empty() {
            diag.skipped(SkipReason::EmptyField, raw_line);
            return Ok(Extraction::Skipped(SkipReason::EmptyField));
        }

        // A trailing slash yields an empty third segment; emitted keys must
        // be non-empty, so that case skips exactly like a short date.
        let year = match date.split('/').nth(2) {
            Some(year) if !year.is_empty() => year,
            _ => {
                if self.policy.log_malformed_dates {
                    diag.skipped(SkipReason::MalformedDate, raw_line);
                }
                return Ok(Extraction::Skipped(SkipReason::MalformedDate));
            }
        };

        let count = match aboard.parse::<i64>() {
            Ok(count) => count,
            Err(source) => match self.policy.on_malformed_count {
                AboardPolicy::Abort => {
                    return Err(ExtractError::MalformedCount {
                        value: aboard.clone(),
                        line: raw_line.to_string(),
                        source,
                    })
                }
                AboardPolicy::SkipAndLog => {
                    diag.skipped(SkipReason::MalformedCount, raw_line);
                    return Ok(Extraction::Skipped(SkipReason::MalformedCount));
                }
            },
        };

        Ok(Extraction::Emitted(YearCount {
            year: year.to_string(),
            count,
        }))
    }
}
