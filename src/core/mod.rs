//! Core application primitives: the analysis service and its HTTP surface.

pub mod error;
pub mod http;
pub mod page;
pub mod service;

pub use error::AnalysisError;
pub use http::{create_router, start_server, AppState};
pub use service::{AnalysisOutcome, AnalysisService};
