//! HTTP metrics in the Prometheus exposition format.
//!
//! - `http_requests_total` (counter): requests by method, path, status
//! - `http_request_duration_seconds` (histogram): latency by method, path
//!
//! Paths are normalised so numeric ids do not explode label cardinality.

use axum::{http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

fn builder() -> AppResult<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )
        .map_err(|e| AppError::Config(format!("Invalid metric buckets: {}", e)))
}

/// Installs the global recorder. Call once at startup.
pub fn install_recorder() -> AppResult<PrometheusHandle> {
    builder()?
        .install_recorder()
        .map_err(|e| AppError::Config(format!("Failed to install metrics recorder: {}", e)))
}

/// 指标采集中间件
pub async fn record_metrics<B>(request: Request<B>, next: Next<B>) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Replaces purely numeric path segments with `:id`.
pub fn normalize_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }

    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
