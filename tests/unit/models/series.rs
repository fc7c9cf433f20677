//! Unit tests for price series construction

use chrono::{Duration, TimeZone, Utc};
use tradepilot::models::{Candle, PriceSeries};

fn candle(close: f64, day: i64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
    Candle::new(close, close + 1.0, close - 1.0, close, 1_000.0, ts)
}

#[test]
fn test_series_sorted_by_timestamp() {
    let series = PriceSeries::new("AAPL", vec![candle(3.0, 2), candle(1.0, 0), candle(2.0, 1)]);
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.symbol(), "AAPL");
    assert_eq!(series.last_close(), Some(3.0));
}

#[test]
fn test_series_duplicate_timestamp_keeps_later_bar() {
    let series = PriceSeries::new("AAPL", vec![candle(1.0, 0), candle(5.0, 1), candle(6.0, 1)]);
    assert_eq!(series.len(), 2);
    assert_eq!(series.closes(), vec![1.0, 6.0]);
}

#[test]
fn test_empty_series() {
    let series = PriceSeries::new("AAPL", Vec::new());
    assert!(series.is_empty());
    assert_eq!(series.last_close(), None);
}
