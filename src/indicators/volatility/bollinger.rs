//! Bollinger Bands indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::models::indicators::BollingerSeries;

pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_BOLLINGER_STD_DEV: f64 = 2.0;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(window)
/// Upper Band = Middle + (num_std * sample standard deviation)
/// Lower Band = Middle - (num_std * sample standard deviation)
pub fn bollinger_bands(
    prices: &[f64],
    window: usize,
    num_std: f64,
) -> Result<BollingerSeries, IndicatorError> {
    if window < 2 {
        return Err(IndicatorError::InvalidParameter {
            name: "window",
            reason: "window must span at least two prices".to_string(),
        });
    }

    let mut bands = BollingerSeries {
        middle: vec![None; prices.len()],
        upper: vec![None; prices.len()],
        lower: vec![None; prices.len()],
    };

    for (offset, slice) in prices.windows(window).enumerate() {
        let i = offset + window - 1;
        if let (Some(middle), Some(std)) = (math::mean(slice), math::sample_std_dev(slice)) {
            bands.middle[i] = Some(middle);
            bands.upper[i] = Some(middle + num_std * std);
            bands.lower[i] = Some(middle - num_std * std);
        }
    }

    Ok(bands)
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn bollinger_bands_default(prices: &[f64]) -> Result<BollingerSeries, IndicatorError> {
    bollinger_bands(prices, DEFAULT_BOLLINGER_WINDOW, DEFAULT_BOLLINGER_STD_DEV)
}
