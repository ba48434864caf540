use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use uuid::Uuid;

use super::timing::Stopwatch;
use crate::error::AppError;

/// 请求ID头部名称
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request state created by the request-log middleware.
///
/// A clone is placed in the request extensions for handlers and on the response extensions
/// for the header injector. It is never shared between requests.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub trace_id: String,
    pub stopwatch: Stopwatch,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            trace_id: resolve_trace_id(headers),
            stopwatch: Stopwatch::start(),
        }
    }
}

/// 获取或生成请求ID
///
/// A non-empty `x-request-id` header is propagated verbatim; anything else gets a fresh UUID v4.
pub fn resolve_trace_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::internal("Request context missing; request-log middleware not installed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::collections::HashSet;

    #[test]
    fn propagates_inbound_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(resolve_trace_id(&headers), "abc-123");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("Upper-Case-Id"));
        assert_eq!(resolve_trace_id(&headers), "Upper-Case-Id");
    }

    #[test]
    fn generates_uuid_when_missing_or_empty() {
        let generated = resolve_trace_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        let generated = resolve_trace_id(&headers);
        assert!(!generated.is_empty());
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn non_utf8_header_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        let generated = resolve_trace_id(&headers);
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| resolve_trace_id(&HeaderMap::new())).collect();
        assert_eq!(ids.len(), 1000);
    }
}
