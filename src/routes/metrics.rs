use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use std::sync::Arc;

use crate::AppState;

/// Prometheus text exposition of the installed recorder.
pub async fn render(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.render(),
    )
}
