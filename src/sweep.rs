//! Threshold sensitivity sweep
//!
//! Each threshold is an independent detection run over the same read-only
//! series, so runs are spread across the rayon pool and collected back in
//! input order.

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

use crate::detector::scan;
use crate::series::PriceSeries;
use crate::stats::summarize;
use crate::BreakoutParams;

/// Default thresholds swept when none are configured
pub const DEFAULT_THRESHOLDS: &[f64] = &[3.0, 4.0, 5.0, 6.0, 7.0];

/// Summary of one threshold run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepRow {
    pub threshold_pct: f64,
    pub candidates: usize,
    /// Hold-confirmed breakouts (completed and pending)
    pub total_breakouts: usize,
    pub completed: usize,
    pub pending: usize,
    pub wins: usize,
    /// Wins over completed events; pending breakouts are not counted as losses
    pub win_rate: f64,
    pub avg_return: f64,
    pub median_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub std_return: f64,
}

/// Run detection and summarise it for a single threshold
pub fn sweep_row(series: &PriceSeries, params: &BreakoutParams) -> SweepRow {
    let report = scan(series, params);
    let stats = summarize(&report.events);

    SweepRow {
        threshold_pct: params.threshold_pct,
        candidates: report.candidates,
        total_breakouts: stats.total,
        completed: stats.completed,
        pending: stats.pending,
        wins: stats.wins,
        win_rate: stats.win_rate,
        avg_return: stats.avg_return,
        median_return: stats.median_return,
        min_return: stats.min_return,
        max_return: stats.max_return,
        std_return: stats.std_return,
    }
}

/// Parallel sweep; `base` supplies hold and future days
pub fn run_sweep(series: &PriceSeries, base: &BreakoutParams, thresholds: &[f64]) -> Vec<SweepRow> {
    tracing::info!("Sweeping {} thresholds", thresholds.len());

    thresholds
        .par_iter()
        .map(|&t| sweep_row(series, &base.with_threshold(t)))
        .collect()
}

/// Parallel sweep that ticks `progress_bar` once per finished threshold
pub fn run_sweep_with_progress(
    series: &PriceSeries,
    base: &BreakoutParams,
    thresholds: &[f64],
    progress_bar: &ProgressBar,
) -> Vec<SweepRow> {
    tracing::info!(
        "Sweeping {} thresholds with progress tracking",
        thresholds.len()
    );

    thresholds
        .par_iter()
        .map(|&t| {
            let row = sweep_row(series, &base.with_threshold(t));
            progress_bar.inc(1);
            row
        })
        .collect()
}

/// Sweep on the calling thread only
pub fn run_sweep_sequential(
    series: &PriceSeries,
    base: &BreakoutParams,
    thresholds: &[f64],
) -> Vec<SweepRow> {
    tracing::info!("Sweeping {} thresholds sequentially", thresholds.len());

    thresholds
        .iter()
        .map(|&t| sweep_row(series, &base.with_threshold(t)))
        .collect()
}

/// Sort rows by the named metric, best first
pub fn sort_rows(rows: &mut [SweepRow], sort_by: &str) {
    match sort_by {
        "win_rate" => rows.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate)),
        "avg_return" => rows.sort_by(|a, b| b.avg_return.total_cmp(&a.avg_return)),
        "median_return" => rows.sort_by(|a, b| b.median_return.total_cmp(&a.median_return)),
        "breakouts" => rows.sort_by(|a, b| b.total_breakouts.cmp(&a.total_breakouts)),
        _ => rows.sort_by(|a, b| a.threshold_pct.total_cmp(&b.threshold_pct)),
    }
}

/// Parse a comma-separated list of thresholds, skipping blanks
pub fn parse_thresholds(s: &str) -> anyhow::Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            let value: f64 = x
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid threshold '{}': {}", x, e))?;
            if !value.is_finite() {
                anyhow::bail!("threshold must be finite: {}", x);
            }
            Ok(value)
        })
        .collect()
}
