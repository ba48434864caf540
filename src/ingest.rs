//! Loads the scraped books CSV into the `books` table.
//!
//! The table is replaced wholesale inside one transaction, so a failed load leaves the
//! previous contents untouched. An empty row set is refused before the table is touched.

use diesel::PgConnection;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::db::models::book::NewBook;
use crate::db::repositories::books::BookRepo;
use crate::error::{AppError, AppResult};

pub fn read_books_csv<R: Read>(reader: R) -> AppResult<Vec<NewBook>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut books = Vec::new();
    for row in csv_reader.deserialize() {
        books.push(row?);
    }
    Ok(books)
}

pub fn load_books_csv(path: &Path) -> AppResult<Vec<NewBook>> {
    let books = read_books_csv(File::open(path)?)?;
    info!(path = %path.display(), rows = books.len(), "Books CSV read");
    Ok(books)
}

/// 空数据集（抓取失败）不能清空现有表
pub fn ensure_rows(books: &[NewBook]) -> AppResult<()> {
    if books.is_empty() {
        return Err(AppError::validation(
            "No books to ingest, keeping existing table",
        ));
    }
    Ok(())
}

/// Replaces every stored book with `books`. Returns the number of inserted rows.
pub fn ingest(conn: &mut PgConnection, books: &[NewBook]) -> AppResult<usize> {
    ensure_rows(books)?;
    info!(rows = books.len(), "Replacing books table");
    let inserted = BookRepo::replace_all(conn, books)?;
    info!(inserted, "Books ingested");
    Ok(inserted)
}
