//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{ensure_period, IndicatorError};
use crate::models::indicators::IndicatorSeries;

/// Calculate the simple moving average of `prices`.
///
/// Index `i >= period - 1` holds the mean of `prices[i + 1 - period ..= i]`;
/// earlier indices are `None`. When fewer than `period` prices are supplied the
/// result is empty.
pub fn sma(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    ensure_period("period", period)?;

    if prices.len() < period {
        return Ok(Vec::new());
    }

    let mut out = vec![None; period - 1];
    out.extend(prices.windows(period).map(math::mean));
    Ok(out)
}
