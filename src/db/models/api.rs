use serde::Serialize;

use crate::middleware::context::RequestContext;

// 统一API响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Default)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,
}

impl ResponseMeta {
    /// Meta block carrying the trace id and the time spent so far on this request.
    pub fn for_request(ctx: &RequestContext) -> Self {
        Self {
            request_id: Some(ctx.trace_id.clone()),
            total_count: None,
            execution_time_ms: Some(ctx.stopwatch.elapsed_ms()),
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total_count = Some(total as i64);
        self
    }
}

#[derive(Serialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

// 便捷构造函数
impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.to_string(),
            data: Some(data),
            meta: None,
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn success_with_meta(data: T, message: &str, meta: ResponseMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::success(data, message)
        }
    }

    pub fn created(data: T, message: &str, meta: ResponseMeta) -> Self {
        Self {
            code: 201,
            ..Self::success_with_meta(data, message, meta)
        }
    }

    pub fn error(code: u16, message: &str, errors: Vec<ErrorDetail>) -> Self {
        Self {
            success: false,
            code,
            message: message.to_string(),
            data: None,
            meta: None,
            errors: Some(errors),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn single_error(code: u16, error_code: &str, field: Option<String>, message: &str) -> Self {
        Self::error(
            code,
            message,
            vec![ErrorDetail {
                field,
                code: error_code.to_string(),
                message: message.to_string(),
            }],
        )
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::single_error(401, "UNAUTHORIZED", None, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::single_error(404, "NOT_FOUND", None, message)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::single_error(409, error_code, field, message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::single_error(400, "BAD_REQUEST", None, message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::single_error(500, "INTERNAL_ERROR", None, message)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::single_error(503, "SERVICE_UNAVAILABLE", None, message)
    }
}

// 业务错误码常量
pub mod error_codes {
    pub const USER_USERNAME_EXISTS: &str = "USER_001";
    pub const USER_EMAIL_EXISTS: &str = "USER_002";
}
