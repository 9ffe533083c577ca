use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crashtally::{
    diagnostics::TracingDiagnostics,
    output::{self, RunSummary},
    process::{
        self,
        extract::{AboardPolicy, ExtractPolicy},
        JobOptions,
    },
};
use std::{fs, path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Tally the people aboard per incident year from a crash-record CSV"
)]
struct Args {
    /// Crash-record CSV to read.
    #[arg(long, default_value = "input/Airplane_Crashes_and_Fatalities.csv")]
    input: PathBuf,
    /// Directory receiving part-r-00000, _stats.json and _SUCCESS.
    #[arg(long, default_value = "output")]
    output: PathBuf,
    /// Skip records with a non-numeric aboard count instead of failing the run.
    #[arg(long)]
    skip_bad_counts: bool,
    /// Log records whose date has no third slash-separated segment.
    #[arg(long)]
    log_short_dates: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let args = Args::parse();
    fs::create_dir_all(&args.output)?;

    // ─── 2) map flags onto the extraction policy ─────────────────────
    let policy = ExtractPolicy {
        on_malformed_count: if args.skip_bad_counts {
            AboardPolicy::SkipAndLog
        } else {
            AboardPolicy::Abort
        },
        log_malformed_dates: args.log_short_dates,
    };
    let opts = JobOptions {
        policy,
        ..JobOptions::default()
    };

    // ─── 3) count the input ──────────────────────────────────────────
    let started_at = Utc::now();
    let start = Instant::now();
    let diag = TracingDiagnostics;
    let (totals, stats) = process::count_file(&args.input, &opts, &diag)?;

    // ─── 4) commit the output directory ──────────────────────────────
    let part_path = output::write_totals(&args.output, &totals, &diag)?;
    let summary = RunSummary {
        input: args.input.display().to_string(),
        started_at,
        finished_at: Utc::now(),
        distinct_years: totals.len(),
        stats,
    };
    output::write_summary(&args.output, &summary)?;
    output::write_success(&args.output)?;

    info!(
        part = %part_path.display(),
        years = totals.len(),
        rows = stats.rows,
        emitted = stats.emitted,
        skipped = stats.skipped(),
        elapsed = ?start.elapsed(),
        "run complete"
    );
    Ok(())
}
