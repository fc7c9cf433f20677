//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{ensure_period, IndicatorError};
use crate::models::indicators::IndicatorSeries;

/// Calculate the EMA of `values`.
///
/// Seeded at index `period - 1` with the simple average of the first `period`
/// values, then `ema[i] = value[i] * k + ema[i - 1] * (1 - k)` with
/// `k = 2 / (period + 1)`. Shorter inputs yield an all-`None` series.
pub fn ema(values: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    ensure_period("period", period)?;

    let mut out = vec![None; values.len()];
    if values.len() < period {
        return Ok(out);
    }

    let mut previous = match math::mean(&values[..period]) {
        Some(seed) => seed,
        None => return Ok(out),
    };
    out[period - 1] = Some(previous);

    for i in period..values.len() {
        previous = math::ema_from_previous(values[i], previous, period);
        out[i] = Some(previous);
    }

    Ok(out)
}

/// EMA over a series that starts with undefined positions.
///
/// The recurrence starts at the first defined value; the leading `None`
/// prefix is preserved. Values after the first defined one must all be defined.
pub fn ema_of_series(series: &[Option<f64>], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    ensure_period("period", period)?;

    let first = match series.iter().position(Option::is_some) {
        Some(index) => index,
        None => return Ok(vec![None; series.len()]),
    };

    let tail: Vec<f64> = series[first..].iter().map(|v| v.unwrap_or(f64::NAN)).collect();

    let mut out = vec![None; first];
    out.extend(ema(&tail, period)?);
    Ok(out)
}
