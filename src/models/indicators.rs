use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indicator output aligned positionally with its input. `None` marks positions
/// where the lookback window is not yet full.
pub type IndicatorSeries = Vec<Option<f64>>;

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Chronologically ordered bars for one symbol, free of duplicate timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Build a series from bars in any order. Bars are sorted by timestamp and,
    /// when two bars share a timestamp, the one supplied later wins.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        let mut candles = candles;
        // Stable sort keeps supply order among equal timestamps.
        candles.sort_by_key(|c| c.timestamp);

        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(last) if last.timestamp == candle.timestamp => *last = candle,
                _ => deduped.push(candle),
            }
        }

        Self {
            symbol: symbol.into(),
            candles: deduped,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub middle: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Every indicator series computed for one price series, for charting and tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub sma_short: IndicatorSeries,
    pub sma_long: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
}

/// Latest fully-defined indicator values that fed a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub sma_short: f64,
    pub sma_short_period: usize,
    pub sma_long: f64,
    pub sma_long_period: usize,
    pub rsi: f64,
    pub rsi_period: usize,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
}

/// Last defined value of a series.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

/// One bar with the indicator values aligned to it, for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_upper: Option<f64>,
}
