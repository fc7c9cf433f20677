//! Price series loaders.

pub mod kite;
pub mod market_data;
pub mod retry;
pub mod router;
pub mod yahoo;

pub use market_data::{HistoryRequest, Interval, MarketDataError, MarketDataProvider};
pub use router::{FetchedSeries, MarketDataRouter};
