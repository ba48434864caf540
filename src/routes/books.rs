use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    AppState,
    db::models::{
        api::{ApiResponse, ResponseMeta},
        book::{Book, BookSearchQuery, PriceRangeQuery, TopRatedQuery},
    },
    error::AppResult,
    middleware::{RequestContext, auth::AuthUser},
    routes::with_conn,
    services::BooksService,
    validation::{
        PathParams, QueryParams,
        book::{resolve_top_rated_limit, validate_price_range},
    },
};

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = with_conn(&state, BooksService::list).await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(books.len());
    Ok(Json(ApiResponse::success_with_meta(
        books,
        "Books retrieved successfully",
        meta,
    )))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    PathParams(book_id): PathParams<i32>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = with_conn(&state, move |conn| BooksService::get(conn, book_id)).await?;
    Ok(Json(ApiResponse::success_with_meta(
        book,
        "Book retrieved successfully",
        ResponseMeta::for_request(&ctx),
    )))
}

pub async fn search_books(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<BookSearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = with_conn(&state, move |conn| {
        BooksService::search(conn, params.title.as_deref(), params.category.as_deref())
    })
    .await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(books.len());
    Ok(Json(ApiResponse::success_with_meta(
        books,
        "Books retrieved successfully",
        meta,
    )))
}

pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<TopRatedQuery>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    // 参数校验在获取连接之前
    let limit = resolve_top_rated_limit(params.limit)?;
    let titles = with_conn(&state, move |conn| BooksService::top_rated(conn, limit)).await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(titles.len());
    Ok(Json(ApiResponse::success_with_meta(
        titles,
        "Top rated books retrieved successfully",
        meta,
    )))
}

pub async fn price_range(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    user: AuthUser,
    QueryParams(params): QueryParams<PriceRangeQuery>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    tracing::debug!(user_id = user.id, username = %user.username, "Price range query");
    validate_price_range(params.min, params.max)?;

    let titles = with_conn(&state, move |conn| {
        BooksService::in_price_range(conn, params.min, params.max)
    })
    .await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(titles.len());
    Ok(Json(ApiResponse::success_with_meta(
        titles,
        "Books retrieved successfully",
        meta,
    )))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let categories = with_conn(&state, BooksService::categories).await?;
    let meta = ResponseMeta::for_request(&ctx).with_total(categories.len());
    Ok(Json(ApiResponse::success_with_meta(
        categories,
        "Categories retrieved successfully",
        meta,
    )))
}
