use axum::{
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::context::{REQUEST_ID_HEADER, RequestContext};

/// 添加请求ID到响应头
///
/// Runs outside the request-log layer and reads the context it left on the response.
/// Without a context the header is omitted.
pub async fn inject_request_id<B>(request: Request<B>, next: Next<B>) -> Response {
    let mut response = next.run(request).await;

    let trace_id = match response.extensions().get::<RequestContext>() {
        Some(context) => context.trace_id.clone(),
        None => return response,
    };

    match HeaderValue::from_str(&trace_id) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        Err(_) => debug!(trace_id = %trace_id, "Trace id is not a valid header value"),
    }

    response
}
