pub mod models;
pub mod repositories;

use crate::error::AppResult;
use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager as DbConnectionManager};

pub type DbPool = r2d2::Pool<DbConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str, max_connections: u32) -> AppResult<DbPool> {
    let manager = DbConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_connections)
        .build(manager)?;
    Ok(pool)
}
