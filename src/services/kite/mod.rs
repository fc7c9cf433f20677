//! Kite Connect (Zerodha) brokerage provider.
//!
//! Requires an API key, API secret and a session access token. Symbols are
//! `EXCHANGE:TRADINGSYMBOL` or a bare trading symbol on the default exchange.

mod instruments;
mod provider;

pub use instruments::{parse_instruments_csv, InstrumentKey};
pub use provider::KiteProvider;
