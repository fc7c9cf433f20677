//! Backoff for transient upstream failures.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::market_data::MarketDataError;

/// Run `operation`, retrying up to `max_retries` times while the error is transient.
pub async fn with_backoff<T, F, Fut>(
    provider: &'static str,
    max_retries: usize,
    operation: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    operation
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_delay(Duration::from_secs(2))
                .with_max_times(max_retries),
        )
        .when(MarketDataError::is_transient)
        .notify(|err: &MarketDataError, delay: Duration| {
            warn!(
                provider = provider,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "Market data request failed, retrying"
            );
        })
        .await
}
