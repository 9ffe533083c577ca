// src/output/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::aggregate::YearTotals;
use crate::diagnostics::Diagnostics;
use crate::process::stats::RunStats;

/// Reducer output file, named the way a single-reducer batch job names it.
pub const PART_FILE: &str = "part-r-00000";
/// Empty marker dropped once every output file has been committed.
pub const SUCCESS_MARKER: &str = "_SUCCESS";
/// Machine-readable run summary written next to the part file.
pub const STATS_FILE: &str = "_stats.json";

/// Everything worth keeping about one run, serialized to [`STATS_FILE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub distinct_years: usize,
    pub stats: RunStats,
}

/// Write the final `year<TAB>total` table to `out_dir`, one row per year in
/// ascending key order. The file is staged as `.tmp` and renamed into place
/// so readers never observe a half-written part file.
pub fn write_totals(
    out_dir: &Path,
    totals: &YearTotals,
    diag: &dyn Diagnostics,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let final_path = out_dir.join(PART_FILE);
    let tmp_path = out_dir.join(format!("{}.tmp", PART_FILE));

    {
        let file = File::create(&tmp_path)
            .with_context(|| format!("could not create temporary file {}", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        for (year, total) in totals.iter() {
            diag.finalized(year, total);
            writeln!(writer, "{}\t{}", year, total)
                .with_context(|| format!("writing totals row for year {}", year))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing {}", tmp_path.display()))?;
    }

    fs::rename(&tmp_path, &final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            tmp_path.display(),
            final_path.display()
        )
    })?;

    info!(path = %final_path.display(), years = totals.len(), "totals written");
    Ok(final_path)
}

/// Drop the empty `_SUCCESS` marker into `out_dir`.
pub fn write_success(out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(SUCCESS_MARKER);
    File::create(&path)
        .with_context(|| format!("could not create success marker {}", path.display()))?;
    Ok(path)
}

/// Serialize the run summary next to the part file, staged through `.tmp`.
pub fn write_summary(out_dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    let final_path = out_dir.join(STATS_FILE);
    let tmp_path = out_dir.join(format!("{}.tmp", STATS_FILE));

    let json = serde_json::to_string_pretty(summary).context("serializing run summary")?;
    fs::write(&tmp_path, json)
        .with_context(|| format!("writing run summary to {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            tmp_path.display(),
            final_path.display()
        )
    })?;

    Ok(final_path)
}

/// Read a `year<TAB>total` part file back into totals. Duplicate years are
/// summed, so reading several part files into one [`YearTotals`] behaves
/// like a reduce over their contents.
pub fn read_totals(path: &Path) -> Result<YearTotals> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading totals from {}", path.display()))?;

    let mut totals = YearTotals::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (year, count) = line.split_once('\t').with_context(|| {
            format!("{} line {}: expected year<TAB>total", path.display(), idx + 1)
        })?;
        let count: i64 = count.trim().parse().with_context(|| {
            format!(
                "{} line {}: total `{}` is not an integer",
                path.display(),
                idx + 1,
                count
            )
        })?;
        totals.add(year, count);
    }
    Ok(totals)
}
