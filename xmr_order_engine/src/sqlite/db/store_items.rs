use sqlx::SqliteConnection;

use crate::{db_types::StoreItem, traits::OrderStoreError};

pub async fn fetch_sellable(conn: &mut SqliteConnection) -> Result<Vec<StoreItem>, OrderStoreError> {
    let items = sqlx::query_as("SELECT * FROM store_items WHERE visible = 1 AND active = 1 ORDER BY id ASC")
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn fetch_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<StoreItem>, OrderStoreError> {
    let item = sqlx::query_as("SELECT * FROM store_items WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(item)
}

pub async fn insert(item: StoreItem, conn: &mut SqliteConnection) -> Result<StoreItem, OrderStoreError> {
    let stored = sqlx::query_as(
        r#"
            INSERT INTO store_items (title, description, supplier_url, price, visible, active, date_added)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(item.title)
    .bind(item.description)
    .bind(item.supplier_url)
    .bind(item.price)
    .bind(item.visible)
    .bind(item.active)
    .bind(item.date_added)
    .fetch_one(conn)
    .await?;
    Ok(stored)
}
