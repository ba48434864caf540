pub mod auth;
pub mod books;
pub mod health;
pub mod metrics;
pub mod ml;
pub mod stats;

use crate::{
    AppState,
    error::{AppError, AppResult},
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use diesel::PgConnection;
use std::sync::Arc;
use tokio::task;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/books", get(books::list_books))
        .route("/api/v1/books/search", get(books::search_books))
        .route("/api/v1/books/top-rated", get(books::top_rated))
        .route("/api/v1/books/price-range", get(books::price_range))
        .route("/api/v1/books/:book_id", get(books::get_book))
        .route("/api/v1/categories", get(books::list_categories))
        .route("/api/v1/stats/overview", get(stats::overview))
        .route("/api/v1/stats/categories", get(stats::categories))
        .route("/api/v1/ml/features", get(ml::features))
        .route("/api/v1/ml/training-data", get(ml::training_data))
        .route("/api/v1/ml/predictions", post(ml::predictions))
        .route("/auth", post(auth::create_user))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/:user_id", delete(auth::delete_user))
        .route("/metrics", get(metrics::render))
        .with_state(state)
}

/// 在阻塞线程池中使用数据库连接
pub(crate) async fn with_conn<T, F>(state: &AppState, f: F) -> AppResult<T>
where
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.db.clone();
    task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut *conn)
    })
    .await
    .map_err(|e| AppError::internal(format!("Blocking task failed: {}", e)))?
}
