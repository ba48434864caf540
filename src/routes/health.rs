use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    AppState,
    db::models::api::{ApiResponse, ResponseMeta},
    db::repositories::books::BookRepo,
    middleware::RequestContext,
    routes::with_conn,
};

#[derive(Serialize)]
pub struct Welcome {
    pub message: &'static str,
}

pub async fn root(ctx: RequestContext) -> Json<ApiResponse<Welcome>> {
    Json(ApiResponse::success_with_meta(
        Welcome {
            message: "Welcome to the Books API",
        },
        "OK",
        ResponseMeta::for_request(&ctx),
    ))
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// 数据库不可用时返回 503，不视为处理失败
pub async fn health_check(State(state): State<Arc<AppState>>, ctx: RequestContext) -> Response {
    match with_conn(&state, |conn| Ok(BookRepo::ping(conn)?)).await {
        Ok(()) => {
            let status = HealthStatus {
                status: "ok",
                database: "connected",
            };
            Json(ApiResponse::success_with_meta(
                status,
                "API is up and connected to the database",
                ResponseMeta::for_request(&ctx),
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(trace_id = %ctx.trace_id, error = %e, "Health check failed");
            let mut response = ApiResponse::<()>::service_unavailable("Could not connect to the database");
            response.meta = Some(ResponseMeta::for_request(&ctx));
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
