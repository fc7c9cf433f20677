//! BUY/SELL/HOLD decision rule over the latest indicator values.

use std::cmp::Ordering;

use crate::indicators::{macd, rsi, sma, IndicatorError};
use crate::models::indicators::{last_defined, IndicatorSnapshot};
use crate::models::signal::{Recommendation, SignalKind};

/// Periods and thresholds the rule runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sma_short_period: 20,
            sma_long_period: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl SignalConfig {
    /// Bars needed before every indicator the rule reads is defined.
    pub fn required_bars(&self) -> usize {
        self.sma_long_period
            .max(self.sma_short_period)
            .max(self.macd_slow + self.macd_signal - 1)
            .max(self.rsi_period + 1)
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.sma_short_period == 0 || self.sma_short_period >= self.sma_long_period {
            return Err(IndicatorError::InvalidParameter {
                name: "sma_short_period",
                reason: format!(
                    "short SMA period ({}) must be non-zero and shorter than the long period ({})",
                    self.sma_short_period, self.sma_long_period
                ),
            });
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return Err(IndicatorError::InvalidParameter {
                name: "macd_slow",
                reason: "MACD periods must be greater than zero".to_string(),
            });
        }
        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter {
                name: "macd_fast",
                reason: format!(
                    "fast period ({}) must be shorter than slow period ({})",
                    self.macd_fast, self.macd_slow
                ),
            });
        }
        if self.rsi_period == 0 {
            return Err(IndicatorError::zero_period("rsi_period"));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(IndicatorError::InvalidParameter {
                name: "rsi_thresholds",
                reason: format!(
                    "expected 0 <= oversold ({}) < overbought ({}) <= 100",
                    self.rsi_oversold, self.rsi_overbought
                ),
            });
        }
        Ok(())
    }
}

/// Stateless rule: every call re-derives the indicators from the supplied prices.
#[derive(Debug, Clone, Default)]
pub struct SignalRule {
    config: SignalConfig,
}

impl SignalRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Evaluate the rule on closing prices ordered oldest to newest.
    ///
    /// 1. short SMA > long SMA, RSI < overbought, histogram > 0 => BUY
    /// 2. short SMA < long SMA, RSI > oversold, histogram < 0 => SELL
    /// 3. otherwise HOLD
    pub fn evaluate(&self, prices: &[f64]) -> Result<Recommendation, IndicatorError> {
        let cfg = &self.config;
        cfg.validate()?;

        let required = cfg.required_bars();
        if prices.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: prices.len(),
            });
        }

        let available = prices.len();
        let latest = |series: Vec<Option<f64>>| {
            last_defined(&series).ok_or(IndicatorError::InsufficientData {
                required,
                available,
            })
        };

        let macd_series = macd(prices, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)?;
        let snapshot = IndicatorSnapshot {
            close: prices[prices.len() - 1],
            sma_short: latest(sma(prices, cfg.sma_short_period)?)?,
            sma_short_period: cfg.sma_short_period,
            sma_long: latest(sma(prices, cfg.sma_long_period)?)?,
            sma_long_period: cfg.sma_long_period,
            rsi: latest(rsi(prices, cfg.rsi_period)?)?,
            rsi_period: cfg.rsi_period,
            macd: latest(macd_series.macd)?,
            macd_signal: latest(macd_series.signal)?,
            macd_histogram: latest(macd_series.histogram)?,
        };

        let signal = self.decide(&snapshot);
        let reasons = self.reasons(&snapshot);
        let rationale = format!("{} {}", headline(signal), reasons.join("; "));

        Ok(Recommendation {
            signal,
            rationale,
            reasons,
            snapshot,
        })
    }

    fn decide(&self, s: &IndicatorSnapshot) -> SignalKind {
        let cfg = &self.config;
        if s.sma_short > s.sma_long && s.rsi < cfg.rsi_overbought && s.macd_histogram > 0.0 {
            SignalKind::Buy
        } else if s.sma_short < s.sma_long && s.rsi > cfg.rsi_oversold && s.macd_histogram < 0.0 {
            SignalKind::Sell
        } else {
            SignalKind::Hold
        }
    }

    fn reasons(&self, s: &IndicatorSnapshot) -> Vec<String> {
        let cfg = &self.config;

        let trend = match s.sma_short.partial_cmp(&s.sma_long) {
            Some(Ordering::Greater) => "above",
            Some(Ordering::Less) => "below",
            Some(Ordering::Equal) => "level with",
            None => "not comparable to",
        };

        let momentum = if s.rsi >= cfg.rsi_overbought {
            format!("at or above the overbought level {}", cfg.rsi_overbought)
        } else if s.rsi <= cfg.rsi_oversold {
            format!("at or below the oversold level {}", cfg.rsi_oversold)
        } else if s.rsi.is_nan() {
            "undefined".to_string()
        } else {
            format!("between {} and {}", cfg.rsi_oversold, cfg.rsi_overbought)
        };

        let histogram = match s.macd_histogram.partial_cmp(&0.0) {
            Some(Ordering::Greater) => "positive",
            Some(Ordering::Less) => "negative",
            Some(Ordering::Equal) => "flat",
            None => "undefined",
        };

        vec![
            format!(
                "SMA{} ({:.2}) is {} SMA{} ({:.2})",
                s.sma_short_period, s.sma_short, trend, s.sma_long_period, s.sma_long
            ),
            format!("RSI{} is {:.2}, {}", s.rsi_period, s.rsi, momentum),
            format!(
                "MACD histogram is {} ({:.4}; MACD {:.4}, signal {:.4})",
                histogram, s.macd_histogram, s.macd, s.macd_signal
            ),
        ]
    }
}

fn headline(signal: SignalKind) -> &'static str {
    match signal {
        SignalKind::Buy => "BUY: uptrend with positive momentum and RSI not overbought.",
        SignalKind::Sell => "SELL: downtrend with negative momentum and RSI not oversold.",
        SignalKind::Hold => "HOLD: indicators do not agree on a direction.",
    }
}

/// Run the rule with the default 20/50 SMA, RSI(14) and MACD(12, 26, 9).
pub fn generate_simple_signal(prices: &[f64]) -> Result<Recommendation, IndicatorError> {
    SignalRule::new().evaluate(prices)
}
