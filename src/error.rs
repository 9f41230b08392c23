//! Errors raised while acquiring a price series

use chrono::NaiveDate;
use thiserror::Error;

/// Data acquisition failures. Any of these is fatal to a run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data available for {symbol}")]
    NoData { symbol: String },

    #[error("could not fetch data from any source (tried: {})", .tried.join(", "))]
    AllSymbolsFailed { tried: Vec<String> },

    #[error("provider error for {symbol}: {reason}")]
    Provider { symbol: String, reason: String },

    #[error("duplicate bar for {0}")]
    DuplicateDate(NaiveDate),
}

impl DataError {
    /// True when the provider answered but had nothing for the symbol
    pub fn is_no_data(&self) -> bool {
        matches!(self, DataError::NoData { .. })
    }
}
