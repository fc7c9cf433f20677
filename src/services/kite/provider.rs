use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::instruments::{parse_instruments_csv, InstrumentKey};
use crate::config::KiteCredentials;
use crate::models::indicators::{Candle, PriceSeries};
use crate::services::market_data::{
    HistoryRequest, Interval, MarketDataError, MarketDataProvider,
};
use crate::services::retry::with_backoff;

const PROVIDER: &str = "kite";
const KITE_VERSION: &str = "3";
// Kite interprets from/to in exchange local time.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Deserialize)]
struct KiteEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    data: Option<HistoricalData>,
}

#[derive(Debug, Deserialize)]
struct HistoricalData {
    #[serde(default)]
    candles: Vec<Vec<Value>>,
}

pub struct KiteProvider {
    client: Client,
    base_url: String,
    credentials: KiteCredentials,
    default_exchange: String,
    max_retries: usize,
    instruments: RwLock<HashMap<String, HashMap<String, u64>>>,
}

impl KiteProvider {
    pub fn new(
        credentials: KiteCredentials,
        base_url: impl Into<String>,
        timeout: Duration,
        max_retries: usize,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(credentials, base_url, client).with_max_retries(max_retries))
    }

    pub fn with_client(credentials: KiteCredentials, base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            default_exchange: "NSE".to_string(),
            max_retries: 0,
            instruments: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_default_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.default_exchange = exchange.into().to_uppercase();
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("X-Kite-Version", KITE_VERSION).header(
            "Authorization",
            format!(
                "token {}:{}",
                self.credentials.api_key, self.credentials.access_token
            ),
        )
    }

    /// Resolve the instrument token, downloading the exchange dump on first use.
    async fn instrument_token(&self, key: &InstrumentKey) -> Result<u64, MarketDataError> {
        {
            let cache = self.instruments.read().await;
            if let Some(tokens) = cache.get(&key.exchange) {
                return tokens
                    .get(&key.tradingsymbol)
                    .copied()
                    .ok_or_else(|| not_found(key));
            }
        }

        let tokens = with_backoff(PROVIDER, self.max_retries, || self.fetch_instruments(&key.exchange)).await?;
        info!(
            exchange = %key.exchange,
            count = tokens.len(),
            "Kite: cached {} instruments for {}",
            tokens.len(),
            key.exchange
        );

        let token = tokens.get(&key.tradingsymbol).copied();
        self.instruments.write().await.insert(key.exchange.clone(), tokens);
        token.ok_or_else(|| not_found(key))
    }

    async fn fetch_instruments(&self, exchange: &str) -> Result<HashMap<String, u64>, MarketDataError> {
        let url = format!("{}/instruments/{}", self.base_url, exchange);
        let response = self.authorized(self.client.get(url)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        parse_instruments_csv(&body)
    }

    async fn fetch_historical(
        &self,
        token: u64,
        request: &HistoryRequest,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let (start, end) = request.window(Utc::now());
        let url = format!(
            "{}/instruments/historical/{}/{}",
            self.base_url,
            token,
            kite_interval(request.interval)
        );

        let response = self
            .authorized(self.client.get(url))
            .query(&[("from", kite_time(start)), ("to", kite_time(end))])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: KiteEnvelope = serde_json::from_str(&body).map_err(|e| MarketDataError::Malformed {
            provider: PROVIDER,
            message: e.to_string(),
        })?;
        if envelope.status != "success" {
            return Err(MarketDataError::Upstream {
                provider: PROVIDER,
                status: status.as_u16(),
                message: envelope.message.unwrap_or(envelope.status),
            });
        }

        envelope
            .data
            .map(|d| d.candles)
            .unwrap_or_default()
            .iter()
            .map(|row| parse_candle_row(row))
            .collect()
    }
}

fn not_found(key: &InstrumentKey) -> MarketDataError {
    MarketDataError::SymbolNotFound(format!("{}:{}", key.exchange, key.tradingsymbol))
}

fn kite_interval(interval: Interval) -> &'static str {
    match interval {
        Interval::Minute => "minute",
        Interval::Hour => "60minute",
        Interval::Day => "day",
    }
}

fn kite_time(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(IST_OFFSET_SECONDS) {
        Some(ist) => at.with_timezone(&ist).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// `[timestamp, open, high, low, close, volume(, oi)]`
fn parse_candle_row(row: &[Value]) -> Result<Candle, MarketDataError> {
    let malformed = |message: String| MarketDataError::Malformed {
        provider: PROVIDER,
        message,
    };
    if row.len() < 6 {
        return Err(malformed(format!("candle row has {} fields, expected 6", row.len())));
    }

    let raw_ts = row[0]
        .as_str()
        .ok_or_else(|| malformed("candle timestamp is not a string".to_string()))?;
    let timestamp = DateTime::parse_from_str(raw_ts, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw_ts))
        .map_err(|e| malformed(format!("bad candle timestamp {:?}: {}", raw_ts, e)))?
        .with_timezone(&Utc);

    let mut numbers = [0.0_f64; 5];
    for (slot, value) in numbers.iter_mut().zip(&row[1..6]) {
        *slot = value
            .as_f64()
            .ok_or_else(|| malformed(format!("non-numeric candle field {}", value)))?;
    }
    let [open, high, low, close, volume] = numbers;

    Ok(Candle::new(open, high, low, close, volume, timestamp))
}

fn error_from_body(status: StatusCode, body: &str) -> MarketDataError {
    let envelope: Option<KiteEnvelope> = serde_json::from_str(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| body.chars().take(200).collect());
    let token_error = envelope
        .as_ref()
        .and_then(|e| e.error_type.as_deref())
        .map_or(false, |t| t == "TokenException" || t == "PermissionException");

    if token_error || status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        MarketDataError::Unauthorized {
            provider: PROVIDER,
            message,
        }
    } else {
        MarketDataError::Upstream {
            provider: PROVIDER,
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl MarketDataProvider for KiteProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn get_candles(&self, request: &HistoryRequest) -> Result<PriceSeries, MarketDataError> {
        let key = InstrumentKey::parse(&request.symbol, &self.default_exchange);
        let token = self.instrument_token(&key).await?;
        debug!(symbol = %request.symbol, token = token, "Kite: resolved instrument token");

        let candles = with_backoff(PROVIDER, self.max_retries, || self.fetch_historical(token, request)).await?;
        if candles.is_empty() {
            return Err(MarketDataError::Empty {
                symbol: request.symbol.clone(),
            });
        }

        Ok(PriceSeries::new(request.symbol.clone(), candles))
    }
}
