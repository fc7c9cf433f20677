//! Unit tests for Bollinger Bands

use tradepilot::indicators::{bollinger_bands, bollinger_bands_default, IndicatorError};

#[test]
fn test_bollinger_single_window() {
    let bands = bollinger_bands(&[1.0, 2.0, 3.0, 4.0, 5.0], 5, 2.0).unwrap();
    let std = 2.5_f64.sqrt();
    assert!(bands.middle[..4].iter().all(Option::is_none));
    assert_eq!(bands.middle[4], Some(3.0));
    assert!((bands.upper[4].unwrap() - (3.0 + 2.0 * std)).abs() < 1e-12);
    assert!((bands.lower[4].unwrap() - (3.0 - 2.0 * std)).abs() < 1e-12);
}

#[test]
fn test_bollinger_flat_prices_collapse() {
    let bands = bollinger_bands_default(&[10.0; 25]).unwrap();
    assert_eq!(bands.upper[24], Some(10.0));
    assert_eq!(bands.lower[24], Some(10.0));
}

#[test]
fn test_bollinger_short_input_undefined() {
    let bands = bollinger_bands_default(&[1.0; 5]).unwrap();
    assert_eq!(bands.middle.len(), 5);
    assert!(bands.middle.iter().all(Option::is_none));
}

#[test]
fn test_bollinger_window_too_small() {
    assert!(matches!(
        bollinger_bands(&[1.0, 2.0], 1, 2.0),
        Err(IndicatorError::InvalidParameter { .. })
    ));
}
