//! Core data types used across the breakout analysis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for bar data
#[derive(Debug, Error, PartialEq)]
pub enum BarValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("prices must be finite: open={open}, high={high}, low={low}, close={close}")]
    NonFinitePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// One trading day of OHLC data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// Create a new bar with validation
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Result<Self, BarValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Create a bar without validation (for trusted sources or tests)
    pub fn new_unchecked(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Validate the bar data
    pub fn validate(&self) -> Result<(), BarValidationError> {
        let prices = [self.open, self.high, self.low, self.close];

        if prices.iter().any(|p| !p.is_finite()) {
            return Err(BarValidationError::NonFinitePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if prices.iter().any(|&p| p <= 0.0) {
            return Err(BarValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(BarValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        Ok(())
    }
}

/// Instrument identifier understood by a price provider (e.g. `SI=F`, `SLV`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Symbol(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form used for cache file names (`SI=F` -> `SI_F`)
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day-over-day close change, defined for every bar except the first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    /// Position of the bar in its series
    pub index: usize,
    pub pct_change: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("threshold_pct must be finite, got {0}")]
    NonFiniteThreshold(f64),
}

/// Parameters of a single detection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutParams {
    /// Minimum one-day gain in percent (inclusive)
    pub threshold_pct: f64,
    /// Bars after the breakout day whose close must stay at or above its low
    pub hold_days: usize,
    /// Bars after the breakout day at which the outcome is measured
    pub future_days: usize,
}

impl BreakoutParams {
    pub fn new(threshold_pct: f64, hold_days: usize, future_days: usize) -> Self {
        Self {
            threshold_pct,
            hold_days,
            future_days,
        }
    }

    pub fn with_threshold(self, threshold_pct: f64) -> Self {
        Self {
            threshold_pct,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.threshold_pct.is_finite() {
            return Err(ParamError::NonFiniteThreshold(self.threshold_pct));
        }
        Ok(())
    }
}

impl Default for BreakoutParams {
    fn default() -> Self {
        // 126 trading days ~ six months
        Self::new(5.0, 2, 126)
    }
}

/// Lifecycle state of a breakout candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakoutStatus {
    Rejected,
    Pending,
    Completed,
}

impl std::fmt::Display for BreakoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakoutStatus::Rejected => write!(f, "rejected"),
            BreakoutStatus::Pending => write!(f, "pending"),
            BreakoutStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Forward result of a hold-confirmed breakout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Not enough bars after the breakout day yet
    Pending,
    Completed {
        future_price: f64,
        future_return: f64,
        is_winner: bool,
    },
}

impl Outcome {
    pub fn status(&self) -> BreakoutStatus {
        match self {
            Outcome::Pending => BreakoutStatus::Pending,
            Outcome::Completed { .. } => BreakoutStatus::Completed,
        }
    }
}

/// Close price of one bar in the hold window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A hold-confirmed breakout and its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutEvent {
    pub breakout_date: NaiveDate,
    /// Low of the breakout day, the reference level for hold and outcome
    pub breakout_price: f64,
    pub breakout_return: f64,
    /// Breakout day through `hold_days` bars later, truncated at series end
    pub hold_period: Vec<HoldPoint>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl BreakoutEvent {
    pub fn status(&self) -> BreakoutStatus {
        self.outcome.status()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.outcome, Outcome::Pending)
    }

    pub fn future_price(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Completed { future_price, .. } => Some(future_price),
            Outcome::Pending => None,
        }
    }

    pub fn future_return(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Completed { future_return, .. } => Some(future_return),
            Outcome::Pending => None,
        }
    }

    pub fn is_winner(&self) -> Option<bool> {
        match self.outcome {
            Outcome::Completed { is_winner, .. } => Some(is_winner),
            Outcome::Pending => None,
        }
    }
}
