//! Unit tests for the BUY/SELL/HOLD rule

use tradepilot::indicators::IndicatorError;
use tradepilot::models::SignalKind;
use tradepilot::signals::{generate_simple_signal, SignalConfig, SignalRule};

fn wavy_uptrend(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + 0.01 * x * x + 6.0 * (0.9 * x).sin()
        })
        .collect()
}

#[test]
fn test_default_required_bars_is_long_sma() {
    assert_eq!(SignalConfig::default().required_bars(), 50);
}

#[test]
fn test_insufficient_data_with_49_bars() {
    let prices = wavy_uptrend(49);
    let err = generate_simple_signal(&prices).unwrap_err();
    assert_eq!(
        err,
        IndicatorError::InsufficientData {
            required: 50,
            available: 49
        }
    );
}

#[test]
fn test_exactly_required_bars_succeeds() {
    let prices = wavy_uptrend(50);
    assert!(generate_simple_signal(&prices).is_ok());
}

#[test]
fn test_empty_input_is_insufficient() {
    assert!(matches!(
        generate_simple_signal(&[]),
        Err(IndicatorError::InsufficientData { available: 0, .. })
    ));
}

#[test]
fn test_snapshot_uses_configured_periods() {
    let rec = generate_simple_signal(&wavy_uptrend(60)).unwrap();
    let snapshot = &rec.snapshot;
    assert_eq!(snapshot.sma_short_period, 20);
    assert_eq!(snapshot.sma_long_period, 50);
    assert_eq!(snapshot.rsi_period, 14);
    assert_eq!(snapshot.close, *wavy_uptrend(60).last().unwrap());
    assert_eq!(snapshot.macd_histogram, snapshot.macd - snapshot.macd_signal);
}

#[test]
fn test_rationale_lists_every_indicator() {
    let rec = generate_simple_signal(&wavy_uptrend(60)).unwrap();
    assert_eq!(rec.signal, SignalKind::Buy);
    assert!(rec.rationale.starts_with("BUY"));
    assert_eq!(rec.reasons.len(), 3);
    for needle in ["SMA20", "SMA50", "RSI14", "MACD histogram"] {
        assert!(rec.rationale.contains(needle), "missing {} in {}", needle, rec.rationale);
    }
}

#[test]
fn test_nan_close_yields_hold() {
    let mut prices = wavy_uptrend(60);
    prices[59] = f64::NAN;
    let rec = generate_simple_signal(&prices).unwrap();
    assert_eq!(rec.signal, SignalKind::Hold);
}

#[test]
fn test_custom_config_lookback() {
    let config = SignalConfig {
        sma_short_period: 3,
        sma_long_period: 5,
        rsi_period: 3,
        macd_fast: 2,
        macd_slow: 4,
        macd_signal: 2,
        ..SignalConfig::default()
    };
    assert_eq!(config.required_bars(), 5);

    let rule = SignalRule::with_config(config);
    assert!(matches!(
        rule.evaluate(&[1.0, 2.0, 3.0, 4.0]),
        Err(IndicatorError::InsufficientData { required: 5, available: 4 })
    ));
    assert!(rule.evaluate(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
}

#[test]
fn test_invalid_config_rejected() {
    let inverted = SignalRule::with_config(SignalConfig {
        sma_short_period: 50,
        sma_long_period: 20,
        ..SignalConfig::default()
    });
    assert!(matches!(
        inverted.evaluate(&wavy_uptrend(60)),
        Err(IndicatorError::InvalidParameter { .. })
    ));

    let macd = SignalRule::with_config(SignalConfig {
        macd_fast: 26,
        macd_slow: 12,
        ..SignalConfig::default()
    });
    assert!(matches!(
        macd.evaluate(&wavy_uptrend(60)),
        Err(IndicatorError::InvalidParameter { name: "macd_fast", .. })
    ));

    let thresholds = SignalRule::with_config(SignalConfig {
        rsi_overbought: 30.0,
        rsi_oversold: 70.0,
        ..SignalConfig::default()
    });
    assert!(matches!(
        thresholds.evaluate(&wavy_uptrend(60)),
        Err(IndicatorError::InvalidParameter { .. })
    ));
}
