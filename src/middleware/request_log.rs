use axum::{
    extract::{ConnectInfo, State},
    http::{Request, header::USER_AGENT},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::warn;

use super::context::RequestContext;
use super::logger::{AccessLogRecord, AccessLogger, FALLBACK_STATUS, HTTP_REQUEST_EVENT};

/// 下游处理失败标记
///
/// Attached to a response's extensions when the handler chain failed. The response itself
/// still carries the client-visible status; the access log only uses the message.
#[derive(Clone, Debug)]
pub struct HandlerFailure {
    pub message: String,
}

impl HandlerFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Emits exactly one access log record when dropped.
///
/// Every exit path of the middleware future ends here: a completed response, a
/// flagged failure, or the future being dropped before the handler chain finished.
struct PendingRecord {
    logger: AccessLogger,
    method: String,
    path: String,
    client_ip: Option<String>,
    user_agent: Option<String>,
    context: RequestContext,
    status: Option<u16>,
    error: Option<String>,
}

impl PendingRecord {
    fn complete(&mut self, status: u16) {
        self.status = Some(status);
    }

    fn fail(&mut self, message: String) {
        self.status = None;
        self.error = Some(message);
    }
}

impl Drop for PendingRecord {
    fn drop(&mut self) {
        let error = match (self.status, self.error.take()) {
            (_, Some(message)) => Some(message),
            (None, None) => Some("request ended before a response was produced".to_string()),
            (Some(_), None) => None,
        };

        self.logger.emit(AccessLogRecord {
            event: HTTP_REQUEST_EVENT,
            method: std::mem::take(&mut self.method),
            path: std::mem::take(&mut self.path),
            status_code: self.status.unwrap_or(FALLBACK_STATUS),
            duration_ms: self.context.stopwatch.elapsed_ms(),
            client_ip: self.client_ip.take(),
            user_agent: self.user_agent.take(),
            trace_id: std::mem::take(&mut self.context.trace_id),
            error,
        });
    }
}

/// 请求日志中间件
///
/// Resolves the trace id, times the handler chain and writes one access log record per
/// request. The response from downstream is returned untouched.
pub async fn request_log<B>(
    State(logger): State<AccessLogger>,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    let context = RequestContext::from_headers(request.headers());

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let mut pending = PendingRecord {
        logger,
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        client_ip,
        user_agent,
        context: context.clone(),
        status: None,
        error: None,
    };

    // 供处理器读取
    request.extensions_mut().insert(context.clone());

    let mut response = next.run(request).await;

    match response.extensions().get::<HandlerFailure>() {
        Some(failure) => {
            warn!(
                trace_id = %context.trace_id,
                status = %response.status(),
                error = %failure.message,
                "Handler chain failed"
            );
            pending.fail(failure.message.clone());
        }
        None => pending.complete(response.status().as_u16()),
    }
    drop(pending);

    // 供外层注入响应头
    response.extensions_mut().insert(context);
    response
}
