//! Day-over-day percentage returns

use crate::series::PriceSeries;
use crate::DailyReturn;

/// Percentage change from `from` to `to`, computed as a price ratio
#[inline]
pub fn pct_change(from: f64, to: f64) -> f64 {
    (to / from - 1.0) * 100.0
}

/// One return per bar except the first, in series order
pub fn daily_returns(series: &PriceSeries) -> Vec<DailyReturn> {
    series
        .bars()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| DailyReturn {
            date: pair[1].date,
            index: i + 1,
            pct_change: pct_change(pair[0].close, pair[1].close),
        })
        .collect()
}
