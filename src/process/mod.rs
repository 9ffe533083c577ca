// src/process/mod.rs
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{fs, path::Path, time::Instant};
use tracing::{debug, info, instrument};

use crate::aggregate::YearTotals;
use crate::diagnostics::Diagnostics;
use crate::process::extract::{ExtractError, ExtractPolicy, Extraction, Extractor};
use crate::process::stats::RunStats;

pub mod extract;
pub mod stats;
pub mod tokenize;

/// Lines handed to one parallel map task.
pub const DEFAULT_SHARD_ROWS: usize = 4096;

/// Pipeline knobs. The defaults reproduce the job's observed behavior.
#[derive(Debug, Clone, Copy)]
pub struct JobOptions {
    pub policy: ExtractPolicy,
    /// Lines per map shard; each shard pre-aggregates locally before the
    /// final merge.
    pub shard_rows: usize,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            policy: ExtractPolicy::default(),
            shard_rows: DEFAULT_SHARD_ROWS,
        }
    }
}

/// Count people aboard per incident year across a crash-record CSV file.
///
/// The file is decoded lossily: stray non-UTF-8 bytes become replacement
/// characters instead of failing the read, so a bad byte in a field the
/// job never looks at cannot take down the run.
#[instrument(level = "info", skip(path, opts, diag), fields(path = %path.display()))]
pub fn count_file(
    path: &Path,
    opts: &JobOptions,
    diag: &dyn Diagnostics,
) -> Result<(YearTotals, RunStats)> {
    let start = Instant::now();
    let bytes = fs::read(path)
        .with_context(|| format!("reading crash records from {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let (totals, stats) = count_text(&text, opts, diag)?;
    info!(
        rows = stats.rows,
        emitted = stats.emitted,
        years = totals.len(),
        elapsed = ?start.elapsed(),
        "input counted"
    );
    Ok((totals, stats))
}

/// Count over an in-memory blob of CSV text, one record per line.
pub fn count_text(
    text: &str,
    opts: &JobOptions,
    diag: &dyn Diagnostics,
) -> Result<(YearTotals, RunStats)> {
    let lines: Vec<&str> = text.lines().collect();
    count_lines(&lines, opts, diag)
}

/// Map shards of lines in parallel, pre-aggregating per shard, then merge
/// the partials. Equivalent to running the combiner zero or more times
/// before the final reduce: the totals do not depend on the sharding.
pub fn count_lines(
    lines: &[&str],
    opts: &JobOptions,
    diag: &dyn Diagnostics,
) -> Result<(YearTotals, RunStats)> {
    let extractor = Extractor::new(opts.policy);
    let shard_rows = opts.shard_rows.max(1);

    let partials = lines
        .par_chunks(shard_rows)
        .map(|shard| count_shard(shard, &extractor, diag))
        .collect::<Result<Vec<_>, ExtractError>>()?;

    debug!(shards = partials.len(), "merging shard partials");

    let mut totals = YearTotals::new();
    let mut stats = RunStats::ZERO;
    for (partial, shard_stats) in partials {
        totals.merge(partial);
        stats.add(shard_stats);
    }
    Ok((totals, stats))
}

/// One map task: tokenize and extract every line, summing locally.
fn count_shard(
    lines: &[&str],
    extractor: &Extractor,
    diag: &dyn Diagnostics,
) -> Result<(YearTotals, RunStats), ExtractError> {
    let mut totals = YearTotals::new();
    let mut stats = RunStats::ZERO;

    for line in lines {
        stats.rows += 1;
        match extractor.extract_line(line, diag)? {
            Extraction::Emitted(pair) => {
                totals.add(&pair.year, pair.count);
                stats.emitted += 1;
            }
            Extraction::Skipped(reason) => stats.note_skip(reason),
        }
    }

    Ok((totals, stats))
}
