//! Instrument token lookup from the `/instruments/{exchange}` CSV dump.

use std::collections::HashMap;

use crate::services::market_data::MarketDataError;

/// Exchange and trading symbol of a Kite instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentKey {
    pub exchange: String,
    pub tradingsymbol: String,
}

impl InstrumentKey {
    /// Parse `NSE:INFY` or a bare `INFY` (placed on `default_exchange`).
    pub fn parse(symbol: &str, default_exchange: &str) -> Self {
        let symbol = symbol.trim();
        match symbol.split_once(':') {
            Some((exchange, tradingsymbol)) if !exchange.is_empty() && !tradingsymbol.is_empty() => Self {
                exchange: exchange.to_uppercase(),
                tradingsymbol: tradingsymbol.to_uppercase(),
            },
            _ => Self {
                exchange: default_exchange.to_uppercase(),
                tradingsymbol: symbol.to_uppercase(),
            },
        }
    }
}

/// Map trading symbol to instrument token.
///
/// Only the `instrument_token` and `tradingsymbol` columns are read; both sit
/// before the free-text `name` column, so a plain comma split is enough.
pub fn parse_instruments_csv(csv: &str) -> Result<HashMap<String, u64>, MarketDataError> {
    let malformed = |message: &str| MarketDataError::Malformed {
        provider: "kite",
        message: message.to_string(),
    };

    let mut lines = csv.lines();
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| malformed("empty instruments dump"))?
        .split(',')
        .map(str::trim)
        .collect();

    let token_col = header
        .iter()
        .position(|h| *h == "instrument_token")
        .ok_or_else(|| malformed("instruments dump has no instrument_token column"))?;
    let symbol_col = header
        .iter()
        .position(|h| *h == "tradingsymbol")
        .ok_or_else(|| malformed("instruments dump has no tradingsymbol column"))?;

    let mut tokens = HashMap::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split(',').collect();
        let (Some(token), Some(symbol)) = (fields.get(token_col), fields.get(symbol_col)) else {
            continue;
        };
        if let Ok(token) = token.trim().parse::<u64>() {
            tokens.insert(symbol.trim().trim_matches('"').to_uppercase(), token);
        }
    }

    Ok(tokens)
}
