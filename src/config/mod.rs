//! Environment-driven configuration.
//!
//! `.env` is loaded by the binaries through `dotenvy`; everything here reads
//! plain environment variables so tests can supply their own lookup.

use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::signals::SignalConfig;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_KITE_BASE_URL: &str = "https://api.kite.trade";
pub const DEFAULT_KITE_EXCHANGE: &str = "NSE";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid signal settings: {0}")]
    InvalidSignal(#[from] IndicatorError),
}

/// Current deployment environment (`ENVIRONMENT`, default `sandbox`).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Brokerage credentials. All three are required for the brokerage loader.
#[derive(Clone, PartialEq, Eq)]
pub struct KiteCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
}

impl fmt::Debug for KiteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KiteCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("access_token", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub kite: Option<KiteCredentials>,
    pub kite_base_url: String,
    pub kite_exchange: String,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
    pub http_max_retries: usize,
    pub signal: SignalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: DEFAULT_PORT,
            kite: None,
            kite_base_url: DEFAULT_KITE_BASE_URL.to_string(),
            kite_exchange: DEFAULT_KITE_EXCHANGE.to_string(),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            http_max_retries: 2,
            signal: SignalConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let kite = match (
            get("ZERODHA_API_KEY"),
            get("ZERODHA_API_SECRET"),
            get("ZERODHA_ACCESS_TOKEN"),
        ) {
            (Some(api_key), Some(api_secret), Some(access_token)) => Some(KiteCredentials {
                api_key,
                api_secret,
                access_token,
            }),
            _ => None,
        };

        let signal = signal_from(&get, defaults.signal)?;

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            kite,
            kite_base_url: get("KITE_BASE_URL").unwrap_or(defaults.kite_base_url),
            kite_exchange: get("KITE_EXCHANGE")
                .map(|e| e.to_uppercase())
                .unwrap_or(defaults.kite_exchange),
            yahoo_base_url: get("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECONDS",
                get("HTTP_TIMEOUT_SECONDS"),
                defaults.http_timeout.as_secs(),
            )?),
            http_max_retries: parse_or(
                "HTTP_MAX_RETRIES",
                get("HTTP_MAX_RETRIES"),
                defaults.http_max_retries,
            )?,
            signal,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

/// Rule periods and RSI thresholds, each overridable on its own.
fn signal_from<G>(get: &G, defaults: SignalConfig) -> Result<SignalConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let signal = SignalConfig {
        sma_short_period: parse_or("SMA_SHORT_PERIOD", get("SMA_SHORT_PERIOD"), defaults.sma_short_period)?,
        sma_long_period: parse_or("SMA_LONG_PERIOD", get("SMA_LONG_PERIOD"), defaults.sma_long_period)?,
        rsi_period: parse_or("RSI_PERIOD", get("RSI_PERIOD"), defaults.rsi_period)?,
        macd_fast: parse_or("MACD_FAST_PERIOD", get("MACD_FAST_PERIOD"), defaults.macd_fast)?,
        macd_slow: parse_or("MACD_SLOW_PERIOD", get("MACD_SLOW_PERIOD"), defaults.macd_slow)?,
        macd_signal: parse_or("MACD_SIGNAL_PERIOD", get("MACD_SIGNAL_PERIOD"), defaults.macd_signal)?,
        rsi_overbought: parse_or("RSI_OVERBOUGHT", get("RSI_OVERBOUGHT"), defaults.rsi_overbought)?,
        rsi_oversold: parse_or("RSI_OVERSOLD", get("RSI_OVERSOLD"), defaults.rsi_oversold)?,
    };
    signal.validate()?;
    Ok(signal)
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
