use axum::response::IntoResponse;
use service_core::observability::render_metrics;

pub async fn metrics() -> impl IntoResponse {
    render_metrics()
}
