use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    AppState,
    db::models::{
        api::{ApiResponse, ResponseMeta},
        book::{BookFeatures, Prediction, PredictionInput},
    },
    error::AppResult,
    middleware::RequestContext,
    routes::with_conn,
    services::{BooksService, MlService},
    validation::ValidatedJson,
};

pub async fn features(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<BookFeatures>>>> {
    let books = with_conn(&state, BooksService::list).await?;
    let rows = MlService::features(books, false);
    let meta = ResponseMeta::for_request(&ctx).with_total(rows.len());
    Ok(Json(ApiResponse::success_with_meta(
        rows,
        "Features retrieved successfully",
        meta,
    )))
}

pub async fn training_data(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<BookFeatures>>>> {
    let books = with_conn(&state, BooksService::list).await?;
    let rows = MlService::features(books, true);
    let meta = ResponseMeta::for_request(&ctx).with_total(rows.len());
    Ok(Json(ApiResponse::success_with_meta(
        rows,
        "Training data retrieved successfully",
        meta,
    )))
}

pub async fn predictions(
    ctx: RequestContext,
    ValidatedJson(input): ValidatedJson<PredictionInput>,
) -> AppResult<Json<ApiResponse<Prediction>>> {
    let prediction = MlService::predict(&input)?;
    Ok(Json(ApiResponse::success_with_meta(
        prediction,
        "Prediction computed successfully",
        ResponseMeta::for_request(&ctx),
    )))
}
