//! Unit tests for signal engine

use chrono::{Duration, TimeZone, Utc};
use tradepilot::indicators::IndicatorError;
use tradepilot::models::{Candle, PriceSeries, SignalKind};
use tradepilot::signals::{SignalConfig, SignalEngine};

fn create_uptrend_series(count: usize) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = (0..count)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + 0.01 * x * x + 6.0 * (0.9 * x).sin();
            Candle::new(close - 0.5, close + 1.0, close - 1.0, close, 1_000.0, start + Duration::days(i as i64))
        })
        .collect();
    PriceSeries::new("TEST", candles)
}

#[test]
fn test_analyze_insufficient_data() {
    let series = create_uptrend_series(10);
    let err = SignalEngine::analyze(&series, &SignalConfig::default()).unwrap_err();
    assert!(matches!(err, IndicatorError::InsufficientData { required: 50, available: 10 }));
}

#[test]
fn test_analyze_reports_aligned_series() {
    let series = create_uptrend_series(60);
    let analysis = SignalEngine::analyze(&series, &SignalConfig::default()).unwrap();

    assert_eq!(analysis.recommendation.signal, SignalKind::Buy);
    assert_eq!(analysis.report.sma_short.len(), 60);
    assert_eq!(analysis.report.sma_long.len(), 60);
    assert_eq!(analysis.report.rsi.len(), 60);
    assert_eq!(analysis.report.macd.histogram.len(), 60);
    assert_eq!(analysis.report.bollinger.upper.len(), 60);
    assert_eq!(analysis.series.len(), 60);
}

#[test]
fn test_recent_rows() {
    let series = create_uptrend_series(60);
    let analysis = SignalEngine::analyze(&series, &SignalConfig::default()).unwrap();
    let rows = analysis.recent_rows(5);

    assert_eq!(rows.len(), 5);
    let last = rows.last().unwrap();
    assert_eq!(last.close, series.last_close().unwrap());
    assert_eq!(last.timestamp, series.candles()[59].timestamp);
    assert!(last.rsi.is_some() && last.sma_long.is_some() && last.bb_upper.is_some());
    assert_eq!(last.sma_short, Some(analysis.recommendation.snapshot.sma_short));

    assert_eq!(analysis.recent_rows(500).len(), 60);
}
