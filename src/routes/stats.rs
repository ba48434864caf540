use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    AppState,
    db::models::{
        api::{ApiResponse, ResponseMeta},
        book::{CategoryStats, CollectionOverview},
    },
    error::AppResult,
    middleware::RequestContext,
    routes::with_conn,
    services::BooksService,
};

pub async fn overview(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<CollectionOverview>>> {
    let overview = with_conn(&state, BooksService::overview).await?;
    Ok(Json(ApiResponse::success_with_meta(
        overview,
        "Collection statistics retrieved successfully",
        ResponseMeta::for_request(&ctx),
    )))
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<CategoryStats>>>> {
    let stats = with_conn(&state, BooksService::category_stats).await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(stats.len());
    Ok(Json(ApiResponse::success_with_meta(
        stats,
        "Category statistics retrieved successfully",
        meta,
    )))
}
