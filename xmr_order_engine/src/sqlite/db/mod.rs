//! Low-level SQLite interactions.
//!
//! Everything here is a plain function taking a `&mut SqliteConnection`, so callers can run a
//! single statement on a pooled connection or compose several into one transaction by passing
//! `&mut *tx`.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod orders;
pub mod rates;
pub mod store_items;

const SQLITE_DB_URL: &str = "sqlite://data/xog_store.db";

pub fn db_url() -> String {
    let result = env::var("XOG_DATABASE_URL").unwrap_or_else(|_| {
        info!("XOG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
