use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("not enough history to compute a signal: {required} bars required, {available} available")]
    InsufficientData { required: usize, available: usize },
}

impl IndicatorError {
    pub(crate) fn zero_period(name: &'static str) -> Self {
        IndicatorError::InvalidParameter {
            name,
            reason: "period must be greater than zero".to_string(),
        }
    }
}

/// Reject a zero period before any computation runs.
pub(crate) fn ensure_period(name: &'static str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::zero_period(name));
    }
    Ok(())
}
