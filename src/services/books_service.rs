use diesel::prelude::*;

use crate::{
    db::models::book::{Book, CategoryStats, CollectionOverview},
    db::repositories::books::BookRepo,
    error::AppError,
    validation::book::normalize_search_term,
};

pub struct BooksService;

impl BooksService {
    pub fn list(conn: &mut PgConnection) -> Result<Vec<Book>, AppError> {
        Ok(BookRepo::list_all(conn)?)
    }

    pub fn get(conn: &mut PgConnection, book_id: i32) -> Result<Book, AppError> {
        BookRepo::find_by_id(conn, book_id)?.ok_or_else(|| AppError::not_found("book"))
    }

    pub fn search(
        conn: &mut PgConnection,
        title: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Book>, AppError> {
        let books = BookRepo::search(
            conn,
            normalize_search_term(title),
            normalize_search_term(category),
        )?;
        Ok(books)
    }

    pub fn categories(conn: &mut PgConnection) -> Result<Vec<String>, AppError> {
        Ok(BookRepo::distinct_categories(conn)?)
    }

    /// `limit` must come from [`resolve_top_rated_limit`](crate::validation::book::resolve_top_rated_limit).
    pub fn top_rated(conn: &mut PgConnection, limit: i64) -> Result<Vec<String>, AppError> {
        Ok(BookRepo::top_rated_titles(conn, limit)?)
    }

    /// Bounds must already satisfy [`validate_price_range`](crate::validation::book::validate_price_range).
    pub fn in_price_range(
        conn: &mut PgConnection,
        min: f64,
        max: f64,
    ) -> Result<Vec<String>, AppError> {
        Ok(BookRepo::titles_in_price_range(conn, min, max)?)
    }

    pub fn overview(conn: &mut PgConnection) -> Result<CollectionOverview, AppError> {
        let total_books = BookRepo::count(conn)?;
        let average_price = BookRepo::average_price(conn)?.map(round2);
        let rating_distribution = BookRepo::rating_distribution(conn)?.into_iter().collect();

        Ok(CollectionOverview {
            total_books,
            average_price,
            rating_distribution,
        })
    }

    pub fn category_stats(conn: &mut PgConnection) -> Result<Vec<CategoryStats>, AppError> {
        let stats = BookRepo::category_aggregates(conn)?
            .into_iter()
            .map(|(category, total_books, avg, min, max)| CategoryStats {
                category,
                total_books,
                average_price: avg.map(round2),
                min_price: min.map(round2),
                max_price: max.map(round2),
            })
            .collect();
        Ok(stats)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
