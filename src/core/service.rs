//! Fetch-and-analyze request path: loader, indicator engine, signal rule.

use std::sync::Arc;
use tracing::{info, instrument};

use super::error::AnalysisError;
use crate::metrics::Metrics;
use crate::services::market_data::HistoryRequest;
use crate::services::router::MarketDataRouter;
use crate::signals::{Analysis, SignalConfig, SignalEngine};

/// Result of one request, with the provider that supplied the bars.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub provider: &'static str,
    pub analysis: Analysis,
}

pub struct AnalysisService {
    router: MarketDataRouter,
    signal_config: SignalConfig,
    metrics: Option<Arc<Metrics>>,
}

impl AnalysisService {
    pub fn new(router: MarketDataRouter, signal_config: SignalConfig) -> Self {
        Self {
            router,
            signal_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn has_brokerage(&self) -> bool {
        self.router.has_brokerage()
    }

    #[instrument(skip(self, request), fields(symbol = %request.symbol, interval = %request.interval))]
    pub async fn analyze(
        &self,
        request: &HistoryRequest,
        prefer_brokerage: bool,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let fetched = self.router.fetch(request, prefer_brokerage).await?;
        let analysis = SignalEngine::analyze(&fetched.series, &self.signal_config)?;

        let signal = analysis.recommendation.signal;
        if let Some(metrics) = &self.metrics {
            metrics
                .signals_generated_total
                .with_label_values(&[signal.as_str()])
                .inc();
        }
        info!(
            provider = fetched.provider,
            bars = fetched.series.len(),
            signal = %signal,
            "Generated {} for {}",
            signal,
            request.symbol
        );

        Ok(AnalysisOutcome {
            provider: fetched.provider,
            analysis,
        })
    }
}
