use std::sync::Arc;

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics: Prometheus text exposition of upload, OCR and poll counters.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}

/// Register descriptions for the metrics emitted by the services.
pub fn describe() {
    metrics::describe_counter!("ocr_jobs_total", "OCR jobs submitted");
    metrics::describe_counter!(
        "ocr_jobs_failed",
        "OCR jobs that ended without usable text"
    );
    metrics::describe_counter!("poll_attempts_total", "Job status checks issued");
    metrics::describe_counter!("index_queries_total", "Index queries issued");
    metrics::describe_histogram!(
        "upload_processing_seconds",
        "Time from accepted upload to indexed text"
    );
}
