//! Chooses between the credentialed brokerage provider and the public one.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::models::indicators::PriceSeries;
use crate::services::kite::KiteProvider;
use crate::services::market_data::{HistoryRequest, MarketDataError, MarketDataProvider};
use crate::services::yahoo::YahooProvider;

/// A loaded series and the provider that supplied it.
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    pub series: PriceSeries,
    pub provider: &'static str,
}

pub struct MarketDataRouter {
    brokerage: Option<Arc<dyn MarketDataProvider>>,
    public: Arc<dyn MarketDataProvider>,
    metrics: Option<Arc<Metrics>>,
}

impl MarketDataRouter {
    pub fn new(public: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            brokerage: None,
            public,
            metrics: None,
        }
    }

    pub fn with_brokerage(mut self, brokerage: Arc<dyn MarketDataProvider>) -> Self {
        self.brokerage = Some(brokerage);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build both providers from configuration. The brokerage provider exists
    /// only when all three credentials are set.
    pub fn from_config(config: &Config) -> Result<Self, MarketDataError> {
        let public = YahooProvider::new(
            config.yahoo_base_url.clone(),
            config.http_timeout,
            config.http_max_retries,
        )?;
        let mut router = Self::new(Arc::new(public));

        match &config.kite {
            Some(credentials) => {
                let kite = KiteProvider::new(
                    credentials.clone(),
                    config.kite_base_url.clone(),
                    config.http_timeout,
                    config.http_max_retries,
                )?
                .with_default_exchange(config.kite_exchange.clone());
                info!(api_key = %credentials.api_key, "Kite credentials found, brokerage data enabled");
                router = router.with_brokerage(Arc::new(kite));
            }
            None => {
                info!("Kite credentials incomplete, using public market data only");
            }
        }

        Ok(router)
    }

    pub fn has_brokerage(&self) -> bool {
        self.brokerage.is_some()
    }

    /// Load `request`, trying the brokerage first when asked for and available.
    /// A brokerage failure falls back to the public provider; a public failure
    /// is returned as is.
    pub async fn fetch(
        &self,
        request: &HistoryRequest,
        prefer_brokerage: bool,
    ) -> Result<FetchedSeries, MarketDataError> {
        if prefer_brokerage {
            match &self.brokerage {
                Some(brokerage) => match brokerage.get_candles(request).await {
                    Ok(series) => {
                        return Ok(FetchedSeries {
                            series,
                            provider: brokerage.name(),
                        })
                    }
                    Err(e) => {
                        self.record_failure(brokerage.name());
                        warn!(
                            provider = brokerage.name(),
                            symbol = %request.symbol,
                            error = %e,
                            "Could not fetch from brokerage, falling back to {}",
                            self.public.name()
                        );
                    }
                },
                None => warn!(
                    symbol = %request.symbol,
                    "Brokerage data requested but not configured, using {}",
                    self.public.name()
                ),
            }
        }

        match self.public.get_candles(request).await {
            Ok(series) => Ok(FetchedSeries {
                series,
                provider: self.public.name(),
            }),
            Err(e) => {
                self.record_failure(self.public.name());
                Err(e)
            }
        }
    }

    fn record_failure(&self, provider: &str) {
        if let Some(metrics) = &self.metrics {
            metrics
                .market_data_failures_total
                .with_label_values(&[provider])
                .inc();
        }
    }
}
