use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::services::market_data::MarketDataError;

/// Failure of one fetch-and-analyze request. No partial recommendation is
/// produced alongside an error.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] MarketDataError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl AnalysisError {
    /// Stable machine-readable kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::DataUnavailable(MarketDataError::InvalidRequest(_)) => "invalid_request",
            AnalysisError::DataUnavailable(_) => "data_unavailable",
            AnalysisError::Indicator(IndicatorError::InvalidParameter { .. }) => "invalid_parameter",
            AnalysisError::Indicator(IndicatorError::InsufficientData { .. }) => "insufficient_data",
        }
    }
}
