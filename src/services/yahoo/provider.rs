use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::models::indicators::{Candle, PriceSeries};
use crate::services::market_data::{HistoryRequest, MarketDataError, MarketDataProvider};
use crate::services::retry::with_backoff;

const PROVIDER: &str = "yahoo";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
    max_retries: usize,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration, max_retries: usize) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tradepilot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(base_url, client).with_max_retries(max_retries))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_retries: 0,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MarketDataError::InvalidRequest(format!("bad Yahoo base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::InvalidRequest("Yahoo base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    async fn fetch_chart(&self, request: &HistoryRequest) -> Result<PriceSeries, MarketDataError> {
        let (start, end) = request.window(Utc::now());
        let url = self.chart_url(&request.symbol)?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", request.interval.as_str().to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(request.symbol.clone()));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MarketDataError::Unauthorized {
                provider: PROVIDER,
                message: truncate(&body),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::Upstream {
                provider: PROVIDER,
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        let parsed: ChartResponse = serde_json::from_str(&body).map_err(|e| MarketDataError::Malformed {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        parse_chart(&request.symbol, parsed.chart)
    }
}

fn parse_chart(symbol: &str, chart: Chart) -> Result<PriceSeries, MarketDataError> {
    if let Some(error) = chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        return Err(MarketDataError::Upstream {
            provider: PROVIDER,
            status: 200,
            message: format!("{}: {}", error.code, error.description),
        });
    }

    let result = chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketDataError::Empty {
            symbol: symbol.to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let candles: Vec<Candle> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            // Yahoo pads halted or not-yet-closed bars with nulls.
            Some(Candle::new(
                value_at(&quote.open, i)?,
                value_at(&quote.high, i)?,
                value_at(&quote.low, i)?,
                value_at(&quote.close, i)?,
                value_at(&quote.volume, i).unwrap_or(0.0),
                DateTime::from_timestamp(ts, 0)?,
            ))
        })
        .collect();

    if candles.is_empty() {
        return Err(MarketDataError::Empty {
            symbol: symbol.to_string(),
        });
    }

    debug!(symbol = symbol, count = candles.len(), "Yahoo: parsed {} candles", candles.len());
    Ok(PriceSeries::new(symbol, candles))
}

fn value_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn get_candles(&self, request: &HistoryRequest) -> Result<PriceSeries, MarketDataError> {
        with_backoff(PROVIDER, self.max_retries, || self.fetch_chart(request)).await
    }
}
