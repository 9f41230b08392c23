//! Download command: fetch daily history from Yahoo Finance into {data_dir}/{SYMBOL}_1d.csv

use anyhow::Result;
use breakout_analysis::data::{csv_path, write_csv};
use breakout_analysis::yahoo::YahooProvider;
use tracing::info;

use super::{load_series_from, resolve_config};
use crate::DataArgs;

pub fn run(data: DataArgs) -> Result<()> {
    let config = resolve_config(&data, None)?;
    info!("Starting data download from yahoo");

    println!("\n{}", "=".repeat(60));
    println!("DOWNLOADING DAILY HISTORY FROM YAHOO FINANCE");
    println!("{}", "=".repeat(60));
    println!("  Symbol:     {}", config.data.symbol);
    println!("  Alternates: {:?}", config.data.alternate_symbols);
    println!("  Start:      {}", config.data.start_date);
    println!("  Output:     {}", config.data.data_dir);
    println!("{}\n", "=".repeat(60));

    let provider = YahooProvider::new()?;
    let (symbol, series) = load_series_from(&provider, &config)?;

    let path = csv_path(&config.data.data_dir, &symbol);
    write_csv(&path, series.bars())?;

    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => println!(
            "✓ {}: {} bars ({} to {}) -> {}",
            symbol,
            series.len(),
            first,
            last,
            path.display()
        ),
        _ => println!("✓ {}: {} bars -> {}", symbol, series.len(), path.display()),
    }

    Ok(())
}
