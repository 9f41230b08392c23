//! Subcommand implementations and the config plumbing they share

pub mod analyze;
pub mod download;
pub mod sweep;

use anyhow::{Context, Result};
use breakout_analysis::config::DataSource;
use breakout_analysis::data::{fetch_with_fallback, CsvProvider, PriceProvider};
use breakout_analysis::yahoo::YahooProvider;
use breakout_analysis::{Config, PriceSeries, Symbol};
use itertools::Itertools;
use tracing::info;

use crate::{DataArgs, WindowArgs};

/// Load the config file (or defaults) and layer command-line overrides on top
pub fn resolve_config(args: &DataArgs, window: Option<&WindowArgs>) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = &args.config {
        info!("Loaded configuration from: {}", path);
    }

    if let Some(symbol) = &args.symbol {
        config.data.symbol = symbol.trim().to_string();
    }
    if let Some(alternates) = &args.alternates {
        config.data.alternate_symbols = alternates
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(source) = &args.source {
        config.data.source = source.parse::<DataSource>().map_err(anyhow::Error::msg)?;
    }
    if let Some(dir) = &args.data_dir {
        config.data.data_dir = dir.clone();
    }
    if let Some(start) = &args.start {
        config.data.start_date = start.clone();
    }
    if let Some(end) = &args.end {
        config.data.end_date = Some(end.clone());
    }

    if let Some(window) = window {
        if let Some(hold_days) = window.hold_days {
            config.analysis.hold_days = hold_days;
        }
        if let Some(future_days) = window.future_days {
            config.analysis.future_days = future_days;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Fetch the configured symbol, falling back through the alternates
pub fn load_series(config: &Config) -> Result<(Symbol, PriceSeries)> {
    let provider: Box<dyn PriceProvider> = match config.data.source {
        DataSource::Csv => Box::new(CsvProvider::new(&config.data.data_dir)),
        DataSource::Yahoo => Box::new(YahooProvider::new()?),
    };
    load_series_from(provider.as_ref(), config)
}

pub fn load_series_from(
    provider: &dyn PriceProvider,
    config: &Config,
) -> Result<(Symbol, PriceSeries)> {
    let primary = config.data.symbol();
    let alternates = config.data.alternates();

    info!(
        "Data source: {} (primary {}, alternates [{}])",
        provider.name(),
        primary,
        alternates.iter().join(", ")
    );

    fetch_with_fallback(
        provider,
        &primary,
        &alternates,
        config.data.start()?,
        config.data.end()?,
    )
    .context(format!("Could not load price data for {}", primary))
}
