//! One complete detection run: scan, summary and yearly breakdown

use serde::Serialize;

use crate::detector::{scan, ScanReport};
use crate::series::PriceSeries;
use crate::stats::{summarize, yearly_stats, SummaryStats, YearlyStat};
use crate::{BreakoutEvent, BreakoutParams, ParamError};

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub params: BreakoutParams,
    #[serde(skip)]
    pub scan: ScanReport,
    pub summary: SummaryStats,
    pub yearly: Vec<YearlyStat>,
}

impl Analysis {
    pub fn events(&self) -> &[BreakoutEvent] {
        &self.scan.events
    }
}

/// Detect, evaluate and aggregate for one parameter set
pub fn analyze(series: &PriceSeries, params: &BreakoutParams) -> Result<Analysis, ParamError> {
    params.validate()?;

    let scan = scan(series, params);
    let summary = summarize(&scan.events);
    let yearly = yearly_stats(&scan.events);

    tracing::info!(
        "Found {} days with >= {}% increase, {} confirmed ({} completed, {} pending)",
        scan.candidates,
        params.threshold_pct,
        summary.total,
        summary.completed,
        summary.pending
    );

    Ok(Analysis {
        params: *params,
        scan,
        summary,
        yearly,
    })
}
