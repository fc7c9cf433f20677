//! Indicator engine: pure transforms from closing prices to aligned series.
//!
//! Every function borrows its input, returns a fresh series of the same length
//! (or an empty one where noted) and keeps no state between calls.

pub mod error;

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use error::IndicatorError;
pub use momentum::*;
pub use trend::*;
pub use volatility::*;
