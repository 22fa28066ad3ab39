pub mod health;
pub mod metrics;
pub mod pages;
pub mod query;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Room for the multipart framing and the title field on top of the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the full HTTP surface.
pub fn create_router(state: AppState, prometheus: Arc<PrometheusHandle>) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(pages::home))
        .route("/upload", get(pages::upload_form).post(upload::submit_upload))
        .route("/query", get(pages::query_form).post(query::run_query))
        .route("/health", get(health::health_check))
        .with_state(state)
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(prometheus),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        // Dropping the handler future also cancels any poll loop it is running.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
