//! Public Yahoo Finance chart API provider. No credentials; exchange suffixes
//! such as `RELIANCE.NS` select non-US listings.

mod provider;

pub use provider::YahooProvider;
