use diesel::dsl::{avg, count, max, min};
use diesel::prelude::*;

use crate::db::models::book::{Book, NewBook};

/// Rows per INSERT statement; keeps bind parameters well under the PostgreSQL limit.
const INSERT_BATCH_SIZE: usize = 500;

pub type CategoryAggregate = (String, i64, Option<f64>, Option<f64>, Option<f64>);

pub struct BookRepo;

impl BookRepo {
    pub fn list_all(conn: &mut PgConnection) -> Result<Vec<Book>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books.order(id.asc()).select(Book::as_select()).load(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        book_id: i32,
    ) -> Result<Option<Book>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .filter(id.eq(book_id))
            .select(Book::as_select())
            .first(conn)
            .optional()
    }

    /// Case-insensitive partial match on title and/or category.
    pub fn search(
        conn: &mut PgConnection,
        title_part: Option<&str>,
        category_part: Option<&str>,
    ) -> Result<Vec<Book>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        let mut query = books.into_boxed();
        if let Some(part) = title_part {
            query = query.filter(title.ilike(format!("%{}%", part)));
        }
        if let Some(part) = category_part {
            query = query.filter(category.ilike(format!("%{}%", part)));
        }
        query.order(id.asc()).select(Book::as_select()).load(conn)
    }

    pub fn distinct_categories(
        conn: &mut PgConnection,
    ) -> Result<Vec<String>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .select(category)
            .distinct()
            .order(category.asc())
            .load(conn)
    }

    pub fn top_rated_titles(
        conn: &mut PgConnection,
        limit: i64,
    ) -> Result<Vec<String>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .order((rating.desc(), id.asc()))
            .limit(limit)
            .select(title)
            .load(conn)
    }

    /// Titles whose price lies in `[min_price, max_price]`.
    pub fn titles_in_price_range(
        conn: &mut PgConnection,
        min_price: f64,
        max_price: f64,
    ) -> Result<Vec<String>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .filter(price.ge(min_price))
            .filter(price.le(max_price))
            .order((price.asc(), id.asc()))
            .select(title)
            .load(conn)
    }

    pub fn count(conn: &mut PgConnection) -> Result<i64, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books.count().get_result(conn)
    }

    pub fn average_price(conn: &mut PgConnection) -> Result<Option<f64>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books.select(avg(price)).first(conn)
    }

    pub fn rating_distribution(
        conn: &mut PgConnection,
    ) -> Result<Vec<(i32, i64)>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .group_by(rating)
            .select((rating, count(id)))
            .order(rating.asc())
            .load(conn)
    }

    pub fn category_aggregates(
        conn: &mut PgConnection,
    ) -> Result<Vec<CategoryAggregate>, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        books
            .group_by(category)
            .select((category, count(id), avg(price), min(price), max(price)))
            .order(category.asc())
            .load(conn)
    }

    /// Deletes every stored book and inserts `rows`, atomically.
    pub fn replace_all(
        conn: &mut PgConnection,
        rows: &[NewBook],
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::books::dsl::*;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(books).execute(conn)?;
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_BATCH_SIZE) {
                inserted += diesel::insert_into(books).values(chunk).execute(conn)?;
            }
            Ok(inserted)
        })
    }

    pub fn ping(conn: &mut PgConnection) -> Result<(), diesel::result::Error> {
        diesel::sql_query("SELECT 1").execute(conn).map(|_| ())
    }
}
