//! Data loading and management
//!
//! Defines the price provider contract, loads daily bars from CSV files and
//! implements the alternate-symbol fallback used by the command layer.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::DataError;
use crate::series::PriceSeries;
use crate::{Bar, Symbol};

/// Supplies an ordered daily series for a symbol.
///
/// Implementations must return `DataError::NoData` when the symbol
/// resolves to nothing.
pub trait PriceProvider {
    fn name(&self) -> &str;

    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> std::result::Result<Vec<Bar>, DataError>;
}

// =============================================================================
// CSV Data Loading
// =============================================================================

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64> {
    record
        .get(idx)
        .context(format!("Missing {} column", name))?
        .trim()
        .parse()
        .context(format!("Failed to parse {}", name))
}

/// Load daily bars from a CSV file (`date,open,high,low,close[,volume]`)
///
/// Rows that fail bar validation are skipped with a warning.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).context("Failed to open CSV file")?;

    let mut bars = Vec::new();
    let mut invalid_count = 0;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.context(format!("Failed to read row {}", row_idx + 1))?;

        let date_str = record.get(0).context("Missing date column")?;
        let date = parse_date(date_str)?;

        let open = parse_field(&record, 1, "open")?;
        let high = parse_field(&record, 2, "high")?;
        let low = parse_field(&record, 3, "low")?;
        let close = parse_field(&record, 4, "close")?;
        let volume = record
            .get(5)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<f64>().context("Failed to parse volume"))
            .transpose()?;

        match Bar::new(date, open, high, low, close) {
            Ok(bar) => bars.push(match volume {
                Some(v) => bar.with_volume(v),
                None => bar,
            }),
            Err(e) => {
                invalid_count += 1;
                warn!(
                    "Skipping invalid bar at row {} in {:?}: {}",
                    row_idx + 2, // +2 for 1-indexed and header row
                    path.file_name().unwrap_or_default(),
                    e
                );
            }
        }
    }

    if invalid_count > 0 {
        warn!(
            "Skipped {} invalid bars out of {} in {:?}",
            invalid_count,
            invalid_count + bars.len(),
            path.file_name().unwrap_or_default()
        );
    }

    Ok(bars)
}

/// Write bars to CSV in the format read by [`load_csv`]
pub fn write_csv(path: impl AsRef<Path>, bars: &[Bar]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create data directory")?;
    }

    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV file")?;
    writer.write_record(["date", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        writer.write_record(&[
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} bars to {}", bars.len(), path.display());
    Ok(())
}

/// Keep bars with `start <= date <= end`
pub fn filter_bars_by_date(
    bars: Vec<Bar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Bar> {
    bars.into_iter()
        .filter(|b| {
            let after_start = start.is_none_or(|s| b.date >= s);
            let before_end = end.is_none_or(|e| b.date <= e);
            after_start && before_end
        })
        .collect()
}

/// Parse a date string (YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339) to a calendar date
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let date_str = date_str.trim();

    if let Ok(nd) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(nd);
    }

    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(ndt.date());
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    anyhow::bail!(
        "Failed to parse date: {}. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS format",
        date_str
    )
}

/// Cache file for a symbol's daily bars
pub fn csv_path(data_dir: impl AsRef<Path>, symbol: &Symbol) -> PathBuf {
    data_dir
        .as_ref()
        .join(format!("{}_1d.csv", symbol.file_stem()))
}

// =============================================================================
// Providers
// =============================================================================

/// Reads `{data_dir}/{symbol}_1d.csv`
#[derive(Debug, Clone)]
pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvProvider {
            data_dir: data_dir.into(),
        }
    }
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> std::result::Result<Vec<Bar>, DataError> {
        let path = csv_path(&self.data_dir, symbol);
        if !path.exists() {
            warn!("Data file not found: {}", path.display());
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let bars = load_csv(&path).map_err(|e| DataError::Provider {
            symbol: symbol.to_string(),
            reason: format!("{:#}", e),
        })?;
        let original_len = bars.len();
        let bars = filter_bars_by_date(bars, Some(start), end);

        info!(
            "Loaded {} bars for {} (filtered from {} total)",
            bars.len(),
            symbol,
            original_len
        );

        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

/// Fetch `primary`, then each of `alternates` in order, until one has data.
///
/// Returns the symbol that succeeded together with its series.
pub fn fetch_with_fallback<P: PriceProvider + ?Sized>(
    provider: &P,
    primary: &Symbol,
    alternates: &[Symbol],
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> std::result::Result<(Symbol, PriceSeries), DataError> {
    let mut tried = Vec::new();

    for symbol in std::iter::once(primary).chain(alternates) {
        info!(
            "Fetching {} data from {} via {}...",
            symbol,
            start,
            provider.name()
        );
        tried.push(symbol.to_string());

        let bars = match provider.fetch(symbol, start, end) {
            Ok(bars) if !bars.is_empty() => bars,
            Ok(_) => {
                warn!("No data found for {}", symbol);
                continue;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", symbol, e);
                continue;
            }
        };

        let series = PriceSeries::new(bars)?;
        if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
            info!(
                "Fetched {} days of data for {} ({} to {})",
                series.len(),
                symbol,
                first,
                last
            );
        }
        return Ok((symbol.clone(), series));
    }

    Err(DataError::AllSymbolsFailed { tried })
}
