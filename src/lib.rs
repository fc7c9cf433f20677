//! Technical-indicator trade recommendations.
//!
//! Price bars come from a brokerage ([`services::kite`]) or a public source
//! ([`services::yahoo`]); the [`indicators`] engine derives SMA, EMA, RSI, MACD
//! and Bollinger series and [`signals`] turns the latest values into a
//! BUY/SELL/HOLD recommendation.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use signals::generate_simple_signal;
