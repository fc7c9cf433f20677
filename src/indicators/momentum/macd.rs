//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::trend::{ema, ema_of_series};
use crate::models::indicators::{IndicatorSeries, MacdSeries};

pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// Calculate MACD
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// All three series stay undefined until `slow + signal - 1` prices exist.
pub fn macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdSeries, IndicatorError> {
    ensure_period("fast_period", fast_period)?;
    ensure_period("slow_period", slow_period)?;
    ensure_period("signal_period", signal_period)?;
    if fast_period >= slow_period {
        return Err(IndicatorError::InvalidParameter {
            name: "fast_period",
            reason: format!(
                "fast period ({}) must be shorter than slow period ({})",
                fast_period, slow_period
            ),
        });
    }

    let fast_ema = ema(prices, fast_period)?;
    let slow_ema = ema(prices, slow_period)?;

    let macd_line: IndicatorSeries = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(fast, slow)| Some((*fast)? - (*slow)?))
        .collect();

    let signal_line = ema_of_series(&macd_line, signal_period)?;

    let histogram: IndicatorSeries = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(line, signal)| Some((*line)? - (*signal)?))
        .collect();

    let first_defined = macd_lookback(slow_period, signal_period);
    Ok(MacdSeries {
        macd: mask_before(macd_line, first_defined),
        signal: mask_before(signal_line, first_defined),
        histogram: mask_before(histogram, first_defined),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn macd_default(prices: &[f64]) -> Result<MacdSeries, IndicatorError> {
    macd(prices, DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL)
}

/// Index of the first defined MACD output.
pub fn macd_lookback(slow_period: usize, signal_period: usize) -> usize {
    slow_period + signal_period - 2
}

fn mask_before(mut series: IndicatorSeries, first_defined: usize) -> IndicatorSeries {
    let end = first_defined.min(series.len());
    series[..end].iter_mut().for_each(|v| *v = None);
    series
}
