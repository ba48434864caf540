pub mod auth;
pub mod context;
pub mod logger;
pub mod request_id;
pub mod request_log;
pub mod timing;

pub use context::{REQUEST_ID_HEADER, RequestContext};
pub use logger::{AccessLogRecord, AccessLogSink, AccessLogger};
pub use request_id::inject_request_id;
pub use request_log::{HandlerFailure, request_log};

use axum::{
    Json, Router,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

use crate::db::models::api::ApiResponse;
use crate::metrics::record_metrics;

/// 挂载请求观测中间件
///
/// Layer order from the outside in: response header injector, request log, metrics,
/// panic guard, then the routes.
pub fn observe<S>(router: Router<S>, access_logger: AccessLogger) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(record_metrics))
        .layer(from_fn_with_state(access_logger, request_log))
        .layer(from_fn(inject_request_id))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::internal_error("Internal server error")),
    )
        .into_response();
    response
        .extensions_mut()
        .insert(HandlerFailure::new(format!("panic: {}", message)));
    response
}
