//! Signal evaluation interfaces.

pub mod engine;
pub mod rule;

pub use engine::{Analysis, SignalEngine, MIN_CANDLES};
pub use rule::{generate_simple_signal, SignalConfig, SignalRule};
