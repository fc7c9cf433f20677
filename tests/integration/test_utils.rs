//! Shared fixtures for integration tests

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tradepilot::core::{create_router, AnalysisService, AppState};
use tradepilot::metrics::Metrics;
use tradepilot::models::{Candle, PriceSeries};
use tradepilot::services::{HistoryRequest, MarketDataError, MarketDataProvider, MarketDataRouter};
use tradepilot::signals::SignalConfig;

/// Closes of an uptrend with pullbacks; the default rule reads BUY at 60 bars.
pub fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + 0.01 * x * x + 6.0 * (0.9 * x).sin()
        })
        .collect()
}

pub fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(close, close + 1.0, close - 1.0, close, 1_000.0, start + Duration::days(i as i64))
        })
        .collect();
    PriceSeries::new(symbol, candles)
}

enum StubReply {
    Bars(Vec<f64>),
    Empty,
    UnknownSymbol,
}

/// Provider returning canned bars or a fixed failure.
pub struct StubProvider {
    name: &'static str,
    reply: StubReply,
    pub calls: AtomicUsize,
}

impl StubProvider {
    pub fn serving(name: &'static str, closes: Vec<f64>) -> Arc<Self> {
        Self::replying(name, StubReply::Bars(closes))
    }

    /// Fails every fetch with `Empty`.
    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::replying(name, StubReply::Empty)
    }

    /// Fails every fetch with `SymbolNotFound`.
    pub fn unknown_symbol(name: &'static str) -> Arc<Self> {
        Self::replying(name, StubReply::UnknownSymbol)
    }

    fn replying(name: &'static str, reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get_candles(&self, request: &HistoryRequest) -> Result<PriceSeries, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Bars(closes) => Ok(series_from_closes(&request.symbol, closes)),
            StubReply::Empty => Err(MarketDataError::Empty {
                symbol: request.symbol.clone(),
            }),
            StubReply::UnknownSymbol => Err(MarketDataError::SymbolNotFound(request.symbol.clone())),
        }
    }
}

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub fn with_router(router: MarketDataRouter) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let service = AnalysisService::new(router.with_metrics(metrics.clone()), SignalConfig::default())
            .with_metrics(metrics.clone());
        let state = AppState {
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            service: Arc::new(service),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }

    /// Server whose public provider serves `closes`.
    pub fn serving(closes: Vec<f64>) -> Self {
        Self::with_router(MarketDataRouter::new(StubProvider::serving("stub", closes)))
    }
}
