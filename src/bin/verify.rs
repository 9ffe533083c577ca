// src/bin/verify.rs
//
// Recounts the input CSV from scratch and checks the published part files
// against it, so a finished output directory can be trusted.

use anyhow::{bail, Context, Result};
use clap::Parser;
use crashtally::{
    aggregate::YearTotals,
    diagnostics::NullDiagnostics,
    output::{self, SUCCESS_MARKER},
    process::{
        self,
        extract::{AboardPolicy, ExtractPolicy},
        JobOptions,
    },
};
use glob::glob;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Check published year totals against a fresh recount")]
struct Args {
    #[arg(long, default_value = "input/Airplane_Crashes_and_Fatalities.csv")]
    input: PathBuf,
    #[arg(long, default_value = "output")]
    output: PathBuf,
    /// Match a run that skipped non-numeric aboard counts.
    #[arg(long)]
    skip_bad_counts: bool,
}

fn people(totals: &YearTotals) -> i64 {
    totals.iter().map(|(_, v)| v).fold(0i64, |a, b| a.saturating_add(b))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1) The success marker must be there, otherwise the run never finished.
    let marker = args.output.join(SUCCESS_MARKER);
    if !marker.is_file() {
        bail!("no {} in '{}'; run did not complete", SUCCESS_MARKER, args.output.display());
    }

    // 2) Find all part files under the output directory.
    let part_pattern = format!("{}/part-r-*", args.output.display());
    let part_paths: Vec<PathBuf> = glob(&part_pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", part_pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.extension().is_none())
        .collect();
    if part_paths.is_empty() {
        return Err(anyhow::anyhow!(
            "No part files found under '{}'",
            part_pattern
        ));
    }

    // 3) In parallel: read every part file, then reduce into one table.
    let partials: Vec<YearTotals> = part_paths
        .par_iter()
        .map(|path| output::read_totals(path))
        .collect::<Result<Vec<_>>>()?;
    let mut published = YearTotals::new();
    for partial in partials {
        published.merge(partial);
    }

    // 4) Recount the input from scratch with the same policy as the run.
    let policy = ExtractPolicy {
        on_malformed_count: if args.skip_bad_counts {
            AboardPolicy::SkipAndLog
        } else {
            AboardPolicy::Abort
        },
        ..ExtractPolicy::default()
    };
    let opts = JobOptions {
        policy,
        ..JobOptions::default()
    };
    let (recount, stats) = process::count_file(&args.input, &opts, &NullDiagnostics)?;

    // 5) Compare both directions so missing and extra years both surface.
    for (year, total) in recount.iter() {
        match published.get(year) {
            Some(have) if have == total => {}
            Some(have) => bail!("year {}: part files say {}, recount says {}", year, have, total),
            None => bail!("year {} is missing from the part files", year),
        }
    }
    for (year, total) in published.iter() {
        if recount.get(year).is_none() {
            bail!("year {} ({} aboard) has no counterpart in the input", year, total);
        }
    }

    // 6) Print summary table
    println!(
        "\n{: <25} {:>10} {:>15}",
        "Source", "Years", "People aboard"
    );
    println!("{:-<52}", "");
    println!(
        "{: <25} {:>10} {:>15}",
        "recount (input)",
        recount.len(),
        people(&recount)
    );
    println!(
        "{: <25} {:>10} {:>15}",
        "part files (output)",
        published.len(),
        people(&published)
    );
    println!(
        "\nok: {} part file(s) match a recount of {} rows",
        part_paths.len(),
        stats.rows
    );

    Ok(())
}
