//! Forward outcome of hold-confirmed breakouts

use crate::series::PriceSeries;
use crate::Outcome;

/// Look up the close `future_days` bars after position `index`.
///
/// Returns `Outcome::Pending` when the series does not reach that far.
/// A future close equal to `breakout_price` is a loss.
pub fn evaluate_outcome(
    series: &PriceSeries,
    index: usize,
    breakout_price: f64,
    future_days: usize,
) -> Outcome {
    let Some(future_bar) = index
        .checked_add(future_days)
        .and_then(|pos| series.get(pos))
    else {
        return Outcome::Pending;
    };

    let future_price = future_bar.close;
    Outcome::Completed {
        future_price,
        future_return: (future_price - breakout_price) / breakout_price * 100.0,
        is_winner: future_price > breakout_price,
    }
}
