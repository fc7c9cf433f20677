//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use super::error::AnalysisError;
use super::page::{self, FormValues, DEFAULT_LOOKBACK_DAYS, RECENT_ROWS};
use super::service::{AnalysisOutcome, AnalysisService};
use crate::indicators::IndicatorError;
use crate::metrics::Metrics;
use crate::models::indicators::IndicatorRow;
use crate::models::signal::Recommendation;
use crate::services::market_data::{HistoryRequest, Interval, MarketDataError};

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub service: Arc<AnalysisService>,
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "brokerage_configured": state.service.has_brokerage(),
        "service": "tradepilot"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Query string shared by the HTML form and the JSON API.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub lookback_days: Option<u32>,
    #[serde(default)]
    pub interval: Option<String>,
    /// HTML checkboxes send `on`; the API also accepts `true`/`1`.
    #[serde(default)]
    pub use_brokerage: Option<String>,
}

impl AnalyzeQuery {
    fn prefer_brokerage(&self) -> bool {
        matches!(
            self.use_brokerage.as_deref().map(str::trim),
            Some("on") | Some("true") | Some("1") | Some("yes")
        )
    }

    fn form_values(&self) -> FormValues {
        let defaults = FormValues::default();
        FormValues {
            symbol: self.symbol.clone().unwrap_or(defaults.symbol),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            interval: self
                .interval
                .as_deref()
                .and_then(|i| i.parse().ok())
                .unwrap_or(defaults.interval),
            use_brokerage: self.prefer_brokerage(),
        }
    }

    fn history_request(&self) -> Result<HistoryRequest, MarketDataError> {
        let interval = match self.interval.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<Interval>()?,
            _ => Interval::Day,
        };
        HistoryRequest::new(
            self.symbol.clone().unwrap_or_default(),
            self.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS),
            interval,
        )
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    symbol: String,
    provider: &'static str,
    interval: Interval,
    bars: usize,
    first_bar: Option<DateTime<Utc>>,
    last_bar: Option<DateTime<Utc>>,
    last_close: Option<f64>,
    recommendation: Recommendation,
    recent: Vec<IndicatorRow>,
}

impl AnalyzeResponse {
    fn new(request: &HistoryRequest, outcome: AnalysisOutcome) -> Self {
        let series = &outcome.analysis.series;
        Self {
            symbol: series.symbol().to_string(),
            provider: outcome.provider,
            interval: request.interval,
            bars: series.len(),
            first_bar: series.candles().first().map(|c| c.timestamp),
            last_bar: series.candles().last().map(|c| c.timestamp),
            last_close: series.last_close(),
            recent: outcome.analysis.recent_rows(RECENT_ROWS),
            recommendation: outcome.analysis.recommendation,
        }
    }
}

pub fn error_status(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::DataUnavailable(MarketDataError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
        AnalysisError::DataUnavailable(MarketDataError::SymbolNotFound(_)) => StatusCode::NOT_FOUND,
        AnalysisError::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Indicator(IndicatorError::InvalidParameter { .. }) => StatusCode::BAD_REQUEST,
        AnalysisError::Indicator(IndicatorError::InsufficientData { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn run_analysis(
    state: &AppState,
    query: &AnalyzeQuery,
) -> Result<(HistoryRequest, AnalysisOutcome), AnalysisError> {
    let request = query.history_request()?;
    let outcome = state
        .service
        .analyze(&request, query.prefer_brokerage())
        .await
        .map_err(|e| {
            warn!(symbol = %request.symbol, error = %e, "Analysis failed");
            e
        })?;
    Ok((request, outcome))
}

/// Landing page with the input form.
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render_form_page(
        &FormValues::default(),
        state.service.has_brokerage(),
    ))
}

/// Form submission: fetch, analyze and render the result page.
async fn analyze_page(State(state): State<AppState>, Query(query): Query<AnalyzeQuery>) -> Response {
    let form = query.form_values();
    let brokerage = state.service.has_brokerage();

    match run_analysis(&state, &query).await {
        Ok((_, outcome)) => Html(page::render_result_page(&form, brokerage, &outcome)).into_response(),
        Err(e) => (
            error_status(&e),
            Html(page::render_error_page(&form, brokerage, &e)),
        )
            .into_response(),
    }
}

/// JSON variant of the analysis.
async fn analyze_api(State(state): State<AppState>, Query(query): Query<AnalyzeQuery>) -> Response {
    match run_analysis(&state, &query).await {
        Ok((request, outcome)) => Json(AnalyzeResponse::new(&request, outcome)).into_response(),
        Err(e) => (
            error_status(&e),
            Json(json!({
                "error": e.kind(),
                "message": e.to_string(),
            })),
        )
            .into_response(),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", get(analyze_page))
        .route("/api/analyze", get(analyze_api))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    service: Arc<AnalysisService>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        metrics,
        start_time: Arc::new(Instant::now()),
        service,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
