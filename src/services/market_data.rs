//! Market data provider interface.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::indicators::PriceSeries;

pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// Every variant means the requested price history could not be supplied.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("authentication with {provider} failed: {message}")]
    Unauthorized {
        provider: &'static str,
        message: String,
    },

    #[error("no bars returned for {symbol} over the requested window")]
    Empty { symbol: String },

    #[error("{provider} responded with HTTP {status}: {message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response from {provider}: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl MarketDataError {
    /// Worth another attempt: network trouble, throttling or a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::Transport(e) => !e.is_decode() && !e.is_builder(),
            MarketDataError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute,
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "1d")]
    Day,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Day, Interval::Hour, Interval::Minute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute => "1m",
            Interval::Hour => "1h",
            Interval::Day => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Interval::Minute),
            "1h" => Ok(Interval::Hour),
            "1d" => Ok(Interval::Day),
            other => Err(MarketDataError::InvalidRequest(format!(
                "unsupported interval {:?} (expected 1m, 1h or 1d)",
                other
            ))),
        }
    }
}

/// What to load: a symbol, how many calendar days back, and the bar size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(
        symbol: impl Into<String>,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Self, MarketDataError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "symbol must not be empty".to_string(),
            ));
        }
        if lookback_days == 0 || lookback_days > MAX_LOOKBACK_DAYS {
            return Err(MarketDataError::InvalidRequest(format!(
                "lookback must be between 1 and {} days, got {}",
                MAX_LOOKBACK_DAYS, lookback_days
            )));
        }
        Ok(Self {
            symbol,
            lookback_days,
            interval,
        })
    }

    /// `(start, end)` of the requested window ending at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - Duration::days(i64::from(self.lookback_days)), now)
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Get historical candles for the requested symbol and window.
    async fn get_candles(&self, request: &HistoryRequest) -> Result<PriceSeries, MarketDataError>;
}
