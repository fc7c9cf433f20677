//! Signal evaluation over a loaded price series.

use serde::Serialize;
use tracing::debug;

use crate::indicators::{bollinger_bands_default, macd, rsi, sma, IndicatorError};
use crate::models::indicators::{IndicatorReport, IndicatorRow, PriceSeries};
use crate::models::signal::Recommendation;
use crate::signals::rule::{SignalConfig, SignalRule};

/// Bars required by the default rule (the long SMA period).
pub const MIN_CANDLES: usize = 50;

/// Everything the presentation layer renders for one request.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub series: PriceSeries,
    pub report: IndicatorReport,
    pub recommendation: Recommendation,
}

pub struct SignalEngine;

impl SignalEngine {
    /// Evaluate the recommendation for `series` and compute the full indicator
    /// series for display.
    pub fn analyze(series: &PriceSeries, config: &SignalConfig) -> Result<Analysis, IndicatorError> {
        let closes = series.closes();
        let recommendation = SignalRule::with_config(config.clone()).evaluate(&closes)?;

        let report = IndicatorReport {
            sma_short: sma(&closes, config.sma_short_period)?,
            sma_long: sma(&closes, config.sma_long_period)?,
            rsi: rsi(&closes, config.rsi_period)?,
            macd: macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal)?,
            bollinger: bollinger_bands_default(&closes)?,
        };

        debug!(
            symbol = %series.symbol(),
            bars = closes.len(),
            signal = %recommendation.signal,
            "SignalEngine: evaluated {} bars for {}",
            closes.len(),
            series.symbol()
        );

        Ok(Analysis {
            series: series.clone(),
            report,
            recommendation,
        })
    }
}

impl Analysis {
    /// The last `count` bars with their indicator values, oldest first.
    pub fn recent_rows(&self, count: usize) -> Vec<IndicatorRow> {
        let candles = self.series.candles();
        let start = candles.len().saturating_sub(count);

        (start..candles.len())
            .map(|i| IndicatorRow {
                timestamp: candles[i].timestamp,
                close: candles[i].close,
                rsi: at(&self.report.rsi, i),
                macd: at(&self.report.macd.macd, i),
                macd_signal: at(&self.report.macd.signal, i),
                sma_short: at(&self.report.sma_short, i),
                sma_long: at(&self.report.sma_long, i),
                bb_lower: at(&self.report.bollinger.lower, i),
                bb_upper: at(&self.report.bollinger.upper, i),
            })
            .collect()
    }
}

fn at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}
