//! Summary statistics over breakout events
//!
//! Outcome statistics only look at completed events. Empty inputs produce
//! zeros rather than NaN so that "no breakouts" is a reportable result.

use chrono::Datelike;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::BTreeMap;

use crate::BreakoutEvent;

/// Years with fewer completed breakouts than this are left out of the yearly table
pub const MIN_EVENTS_PER_YEAR: usize = 2;

/// Aggregate results of one detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    /// All hold-confirmed events
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of completed events that are winners
    pub win_rate: f64,
    pub avg_return: f64,
    pub median_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    /// Sample standard deviation of the forward return
    pub std_return: f64,
    /// Mean one-day gain over all confirmed events
    pub avg_breakout_return: f64,
}

/// Completed-breakout counts for one calendar year
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyStat {
    pub year: i32,
    pub total: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_return: f64,
}

impl YearlyStat {
    fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    fn add_event(&mut self, future_return: f64, is_winner: bool) {
        // running mean keeps a single pass
        self.avg_return += (future_return - self.avg_return) / (self.total + 1) as f64;
        self.total += 1;
        if is_winner {
            self.wins += 1;
        }
        self.win_rate = percentage(self.wins, self.total);
    }
}

/// `part / whole` in percent, 0 when `whole` is 0
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Global statistics for a set of events
pub fn summarize(events: &[BreakoutEvent]) -> SummaryStats {
    let returns: Vec<f64> = events.iter().filter_map(|e| e.future_return()).collect();
    let wins = events.iter().filter(|e| e.is_winner() == Some(true)).count();
    let completed = returns.len();

    let mut stats = SummaryStats {
        total: events.len(),
        completed,
        pending: events.len() - completed,
        wins,
        losses: completed - wins,
        win_rate: percentage(wins, completed),
        avg_breakout_return: finite_or_zero(Statistics::mean(
            events.iter().map(|e| e.breakout_return),
        )),
        ..SummaryStats::default()
    };

    if completed > 0 {
        stats.avg_return = Statistics::mean(returns.iter());
        stats.min_return = Statistics::min(returns.iter());
        stats.max_return = Statistics::max(returns.iter());
        stats.std_return = finite_or_zero(Statistics::std_dev(returns.iter()));
        stats.median_return = Data::new(returns).median();
    }

    stats
}

/// Completed events grouped by calendar year of the breakout date
pub fn yearly_stats(events: &[BreakoutEvent]) -> Vec<YearlyStat> {
    let mut by_year: BTreeMap<i32, YearlyStat> = BTreeMap::new();

    for event in events {
        if let (Some(future_return), Some(is_winner)) = (event.future_return(), event.is_winner()) {
            let year = event.breakout_date.year();
            by_year
                .entry(year)
                .or_insert_with(|| YearlyStat::new(year))
                .add_event(future_return, is_winner);
        }
    }

    by_year
        .into_values()
        .filter(|s| s.total >= MIN_EVENTS_PER_YEAR)
        .collect()
}
