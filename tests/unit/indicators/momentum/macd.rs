//! Unit tests for MACD indicator

use tradepilot::indicators::{macd, macd_default, macd_lookback, IndicatorError};

fn sample_prices(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + 0.3 * x + 4.0 * (x * 0.45).sin()
        })
        .collect()
}

#[test]
fn test_macd_lengths_match_input() {
    let prices = sample_prices(100);
    let out = macd_default(&prices).unwrap();
    assert_eq!(out.macd.len(), prices.len());
    assert_eq!(out.signal.len(), prices.len());
    assert_eq!(out.histogram.len(), prices.len());
}

#[test]
fn test_macd_undefined_until_slow_plus_signal_minus_one_values() {
    let prices = sample_prices(100);
    let out = macd(&prices, 12, 26, 9).unwrap();
    let first = macd_lookback(26, 9);
    assert_eq!(first, 33);

    for series in [&out.macd, &out.signal, &out.histogram] {
        assert!(series[..first].iter().all(Option::is_none));
        assert!(series[first..].iter().all(Option::is_some));
    }
}

#[test]
fn test_macd_histogram_is_line_minus_signal() {
    let prices = sample_prices(120);
    let out = macd_default(&prices).unwrap();
    for i in 0..prices.len() {
        match (out.macd[i], out.signal[i], out.histogram[i]) {
            (Some(line), Some(signal), Some(hist)) => assert_eq!(hist, line - signal),
            (None, None, None) => {}
            other => panic!("misaligned outputs at {}: {:?}", i, other),
        }
    }
}

#[test]
fn test_macd_small_periods() {
    let out = macd(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, 2).unwrap();
    assert_eq!(out.macd, vec![None, None, None, Some(0.5), Some(0.5), Some(0.5)]);
    assert_eq!(out.signal, vec![None, None, None, Some(0.5), Some(0.5), Some(0.5)]);
    assert_eq!(out.histogram, vec![None, None, None, Some(0.0), Some(0.0), Some(0.0)]);
}

#[test]
fn test_macd_insufficient_data_is_undefined() {
    let out = macd_default(&sample_prices(33)).unwrap();
    assert!(out.histogram.iter().all(Option::is_none));
}

#[test]
fn test_macd_invalid_periods() {
    let prices = sample_prices(50);
    assert!(matches!(macd(&prices, 0, 26, 9), Err(IndicatorError::InvalidParameter { .. })));
    assert!(matches!(macd(&prices, 12, 26, 0), Err(IndicatorError::InvalidParameter { .. })));
    assert!(matches!(macd(&prices, 26, 12, 9), Err(IndicatorError::InvalidParameter { .. })));
}
