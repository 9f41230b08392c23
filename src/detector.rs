//! Breakout detection
//!
//! A breakout candidate is any bar whose daily return reaches the threshold.
//! The candidate's low becomes the reference level; it is confirmed only if
//! the close of each of the next `hold_days` bars stays at or above that
//! level. Confirmed candidates are handed to the outcome evaluator and
//! reported as pending or completed. Rejected candidates are counted but
//! never reported as events.

use serde::Serialize;
use tracing::debug;

use crate::outcome::evaluate_outcome;
use crate::returns::daily_returns;
use crate::series::PriceSeries;
use crate::{BreakoutEvent, BreakoutParams, DailyReturn, HoldPoint};

/// Why a candidate failed hold confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The series ends before the hold window does
    InsufficientHistory,
    /// A close inside the hold window dropped below the breakout low
    FailedHold,
}

/// Result of evaluating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateVerdict {
    Rejected {
        index: usize,
        reason: RejectReason,
    },
    Confirmed(BreakoutEvent),
}

/// Full accounting of one detection run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Days whose return reached the threshold
    pub candidates: usize,
    pub rejected_insufficient_history: usize,
    pub rejected_failed_hold: usize,
    /// Hold-confirmed breakouts in ascending date order
    pub events: Vec<BreakoutEvent>,
}

impl ScanReport {
    pub fn rejected(&self) -> usize {
        self.rejected_insufficient_history + self.rejected_failed_hold
    }
}

/// Returns at or above `threshold_pct`, in date order
pub fn find_candidates(series: &PriceSeries, threshold_pct: f64) -> Vec<DailyReturn> {
    daily_returns(series)
        .into_iter()
        .filter(|r| r.pct_change >= threshold_pct)
        .collect()
}

/// Check that closes stay at or above `breakout_price` for `hold_days` bars after `index`
pub fn check_hold(
    series: &PriceSeries,
    index: usize,
    breakout_price: f64,
    hold_days: usize,
) -> Result<(), RejectReason> {
    for j in 1..=hold_days {
        let bar = series
            .get(index + j)
            .ok_or(RejectReason::InsufficientHistory)?;
        if bar.close < breakout_price {
            return Err(RejectReason::FailedHold);
        }
    }
    Ok(())
}

/// Closes from the breakout day through `hold_days` later, truncated at series end
pub fn hold_period(series: &PriceSeries, index: usize, hold_days: usize) -> Vec<HoldPoint> {
    let end = index.saturating_add(hold_days).min(series.len().saturating_sub(1));
    series.bars()[index..=end]
        .iter()
        .map(|b| HoldPoint {
            date: b.date,
            price: b.close,
        })
        .collect()
}

/// Confirm or reject a single candidate and, if confirmed, evaluate its outcome
pub fn evaluate_candidate(
    series: &PriceSeries,
    candidate: &DailyReturn,
    params: &BreakoutParams,
) -> CandidateVerdict {
    let index = candidate.index;
    let breakout_price = series.bars()[index].low;

    if let Err(reason) = check_hold(series, index, breakout_price, params.hold_days) {
        debug!(
            "Rejected breakout on {} ({:.2}%): {:?}",
            candidate.date, candidate.pct_change, reason
        );
        return CandidateVerdict::Rejected { index, reason };
    }

    CandidateVerdict::Confirmed(BreakoutEvent {
        breakout_date: candidate.date,
        breakout_price,
        breakout_return: candidate.pct_change,
        hold_period: hold_period(series, index, params.hold_days),
        outcome: evaluate_outcome(series, index, breakout_price, params.future_days),
    })
}

/// Scan the whole series and account for every candidate
pub fn scan(series: &PriceSeries, params: &BreakoutParams) -> ScanReport {
    let candidates = find_candidates(series, params.threshold_pct);
    let mut report = ScanReport {
        candidates: candidates.len(),
        ..ScanReport::default()
    };

    for candidate in &candidates {
        match evaluate_candidate(series, candidate, params) {
            CandidateVerdict::Confirmed(event) => report.events.push(event),
            CandidateVerdict::Rejected {
                reason: RejectReason::InsufficientHistory,
                ..
            } => report.rejected_insufficient_history += 1,
            CandidateVerdict::Rejected {
                reason: RejectReason::FailedHold,
                ..
            } => report.rejected_failed_hold += 1,
        }
    }

    debug!(
        "threshold={}% hold={} future={}: {} candidates, {} confirmed, {} rejected",
        params.threshold_pct,
        params.hold_days,
        params.future_days,
        report.candidates,
        report.events.len(),
        report.rejected()
    );

    report
}

/// Hold-confirmed breakouts (pending and completed) for one parameter set
pub fn detect_breakouts(series: &PriceSeries, params: &BreakoutParams) -> Vec<BreakoutEvent> {
    scan(series, params).events
}
