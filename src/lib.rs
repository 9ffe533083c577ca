//! Batch tally of people aboard aircraft per crash year.
//!
//! The pipeline reads a crash-record CSV, tokenizes each line with a
//! quote-aware splitter, extracts `(year, aboard)` pairs, and sums them
//! per year. Shards are mapped in parallel and pre-aggregated locally
//! before the final merge, so totals never depend on how the input was
//! split up.

pub mod aggregate;
pub mod diagnostics;
pub mod output;
pub mod process;
