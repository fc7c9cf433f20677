//! Tradepilot API Server
//!
//! Serves the recommendation form, the JSON analysis API, health and metrics.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tradepilot::config::Config;
use tradepilot::core::{start_server, AnalysisService};
use tradepilot::logging;
use tradepilot::metrics::Metrics;
use tradepilot::services::MarketDataRouter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    let port = config.port;

    info!("Starting Tradepilot API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);
    let router = MarketDataRouter::from_config(&config)?.with_metrics(metrics.clone());
    let service = Arc::new(AnalysisService::new(router, config.signal.clone()).with_metrics(metrics.clone()));

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, service, metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
