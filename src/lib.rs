//! Breakout Analysis
//!
//! Detects large single-day gains in a daily price series, confirms that
//! price holds above the breakout day's low for a few bars, and labels the
//! forward outcome. Results are summarised globally, per year and across a
//! sweep of thresholds.
//!
//! ```no_run
//! use breakout_analysis::data::{fetch_with_fallback, CsvProvider};
//! use breakout_analysis::{analysis::analyze, BreakoutParams, Symbol};
//!
//! fn main() -> anyhow::Result<()> {
//!     let provider = CsvProvider::new("data");
//!     let start = chrono::NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
//!     let (symbol, series) =
//!         fetch_with_fallback(&provider, &Symbol::new("SI=F"), &[Symbol::new("SLV")], start, None)?;
//!     let analysis = analyze(&series, &BreakoutParams::new(5.0, 2, 126))?;
//!     println!("{}: win rate {:.1}%", symbol, analysis.summary.win_rate);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod detector;
pub mod error;
pub mod export;
pub mod outcome;
pub mod report;
pub mod returns;
pub mod series;
pub mod stats;
pub mod sweep;
pub mod types;
pub mod yahoo;

pub use config::Config;
pub use error::DataError;
pub use series::PriceSeries;
pub use types::*;
