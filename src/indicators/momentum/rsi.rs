//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::indicators::error::{ensure_period, IndicatorError};
use crate::models::indicators::IndicatorSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss
///
/// The first averages (index `period`) are simple means of the first `period`
/// price changes; later averages use `(prev * (period - 1) + current) / period`.
/// A zero average loss yields 100, which includes a flat series.
pub fn rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    ensure_period("period", period)?;

    let mut out = vec![None; prices.len()];
    if prices.len() < period + 1 {
        return Ok(out);
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);
    for pair in prices.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // gains[j] is the change into prices[j + 1]
    for i in (period + 1)..prices.len() {
        avg_gain = math::wilder_from_previous(gains[i - 1], avg_gain, period);
        avg_loss = math::wilder_from_previous(losses[i - 1], avg_loss, period);
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    Ok(out)
}

/// Calculate RSI with default period (14)
pub fn rsi_default(prices: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
    rsi(prices, DEFAULT_RSI_PERIOD)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
