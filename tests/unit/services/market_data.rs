//! Unit tests for loader request types

use chrono::{Duration, TimeZone, Utc};
use tradepilot::services::{HistoryRequest, Interval, MarketDataError};

#[test]
fn test_interval_parsing() {
    assert_eq!("1d".parse::<Interval>().unwrap(), Interval::Day);
    assert_eq!("1h".parse::<Interval>().unwrap(), Interval::Hour);
    assert_eq!(" 1m ".parse::<Interval>().unwrap(), Interval::Minute);
    assert!(matches!(
        "5m".parse::<Interval>(),
        Err(MarketDataError::InvalidRequest(_))
    ));
    assert_eq!(Interval::Hour.to_string(), "1h");
}

#[test]
fn test_history_request_validation() {
    assert!(HistoryRequest::new("AAPL", 180, Interval::Day).is_ok());
    assert!(HistoryRequest::new("   ", 180, Interval::Day).is_err());
    assert!(HistoryRequest::new("AAPL", 0, Interval::Day).is_err());
    assert!(HistoryRequest::new("AAPL", 100_000, Interval::Day).is_err());
}

#[test]
fn test_history_request_trims_symbol() {
    let request = HistoryRequest::new(" RELIANCE.NS ", 30, Interval::Day).unwrap();
    assert_eq!(request.symbol, "RELIANCE.NS");
}

#[test]
fn test_history_window() {
    let request = HistoryRequest::new("AAPL", 90, Interval::Day).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let (start, end) = request.window(now);
    assert_eq!(end, now);
    assert_eq!(end - start, Duration::days(90));
}

#[test]
fn test_transient_errors() {
    let throttled = MarketDataError::Upstream {
        provider: "yahoo",
        status: 429,
        message: String::new(),
    };
    let bad_request = MarketDataError::Upstream {
        provider: "yahoo",
        status: 400,
        message: String::new(),
    };
    assert!(throttled.is_transient());
    assert!(!bad_request.is_transient());
    assert!(!MarketDataError::SymbolNotFound("X".into()).is_transient());
}
