//! Analyze command: one detection run with summary, recent events and yearly table

use anyhow::Result;
use breakout_analysis::analysis::analyze;
use breakout_analysis::export::{export_events_csv, export_events_json};
use breakout_analysis::report::{render_recent, render_summary, render_yearly};
use std::path::PathBuf;
use tracing::info;

use super::{load_series, resolve_config};
use crate::{DataArgs, WindowArgs};

pub fn run(
    data: DataArgs,
    window: WindowArgs,
    threshold: Option<f64>,
    recent: Option<usize>,
    json: bool,
    no_export: bool,
) -> Result<()> {
    info!("Starting breakout analysis");

    let mut config = resolve_config(&data, Some(&window))?;
    if let Some(t) = threshold {
        config.analysis.threshold_pct = t;
    }
    config.analysis.validate()?;

    let params = config.analysis;
    let (symbol, series) = load_series(&config)?;

    let analysis = analyze(&series, &params)?;

    print!(
        "{}",
        render_summary(&symbol, &params, &analysis.scan, &analysis.summary)
    );
    print!(
        "{}",
        render_recent(
            analysis.events(),
            recent.unwrap_or(config.output.recent),
            params.future_days
        )
    );
    if analysis.summary.completed > 0 {
        print!("{}", render_yearly(&analysis.yearly));
    }

    if !no_export && !analysis.events().is_empty() {
        let results_dir = PathBuf::from(&config.output.results_dir);
        let stem = symbol.file_stem();

        let csv_path = results_dir.join(format!("{}_breakouts.csv", stem));
        export_events_csv(&csv_path, analysis.events())?;
        println!("\nResults exported to {}", csv_path.display());

        if json {
            let json_path = results_dir.join(format!("{}_breakouts.json", stem));
            export_events_json(&json_path, analysis.events())?;
            println!("Events with hold periods exported to {}", json_path.display());
        }
    }

    Ok(())
}
