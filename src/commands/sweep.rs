//! Sweep command: threshold sensitivity table with progress tracking

use anyhow::Result;
use breakout_analysis::export::export_sweep_csv;
use breakout_analysis::report::render_sweep;
use breakout_analysis::sweep::{
    parse_thresholds, run_sweep_sequential, run_sweep_with_progress, sort_rows,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use super::{load_series, resolve_config};
use crate::{DataArgs, WindowArgs};

pub fn run(
    data: DataArgs,
    window: WindowArgs,
    thresholds: Option<String>,
    sort_by: String,
    sequential: bool,
    output: Option<String>,
    no_export: bool,
) -> Result<()> {
    info!("Starting threshold sweep");

    let config = resolve_config(&data, Some(&window))?;
    let thresholds = match thresholds {
        Some(s) => parse_thresholds(&s)?,
        None => config.sweep.thresholds.clone(),
    };
    if thresholds.is_empty() {
        anyhow::bail!("No thresholds to sweep");
    }
    let sequential = sequential || config.sweep.sequential;

    let (symbol, series) = load_series(&config)?;
    let base = config.analysis;

    println!("\n{}", "=".repeat(60));
    println!("THRESHOLD SWEEP: {}", symbol);
    println!("{}", "=".repeat(60));
    println!("  Bars:        {}", series.len());
    println!("  Thresholds:  {:?}", thresholds);
    println!("  Hold days:   {}", base.hold_days);
    println!("  Future days: {}", base.future_days);
    println!(
        "  Mode:        {}",
        if sequential { "sequential" } else { "parallel" }
    );
    println!("{}\n", "=".repeat(60));

    let mut rows = if sequential {
        run_sweep_sequential(&series, &base, &thresholds)
    } else {
        let pb = ProgressBar::new(thresholds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("⚡ {percent:>3}%|{bar:40}| {pos}/{len} [{elapsed}<{eta}, {per_sec}] ✓ {msg}")?
                .progress_chars("█░ "),
        );
        let rows = run_sweep_with_progress(&series, &base, &thresholds, &pb);
        pb.finish_with_message("Complete!");
        rows
    };

    sort_rows(&mut rows, &sort_by);
    print!("{}", render_sweep(&rows));

    if no_export {
        return Ok(());
    }

    let path = output.map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(&config.output.results_dir)
            .join(format!("{}_sweep.csv", symbol.file_stem()))
    });
    export_sweep_csv(&path, &rows)?;
    println!("\nParameter sweep table saved to {}", path.display());

    Ok(())
}
