use service_core::axum::{http::header, response::IntoResponse};

/// Prometheus text exposition of the process metrics.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        service_core::observability::render_metrics(),
    )
}
