//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{
    last_defined, BollingerSeries, Candle, IndicatorReport, IndicatorRow, IndicatorSeries,
    IndicatorSnapshot, MacdSeries, PriceSeries,
};
pub use signal::{Recommendation, SignalKind};
