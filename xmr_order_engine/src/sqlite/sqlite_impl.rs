//! `SqliteDatabase` is the bundled order-engine backend. It implements [`OrderStore`] and
//! [`RateStore`] over a connection pool; the actual SQL lives in [`super::db`].
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, rates, store_items};
use crate::{
    db_types::{Order, OrderDraft, OrderState, RateSnapshot, StoreItem},
    traits::{OrderStore, OrderStoreError, RateStore, RateStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the database at `url`, e.g. `sqlite://data/xog_store.db`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(draft, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_id(id, &mut conn).await
    }

    async fn fetch_orders_in_state(&self, state: OrderState) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_in_state(state, &mut conn).await
    }

    async fn commit_transition(&self, old: &Order, new: &Order) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let stored = orders::commit_transition(old, new, &mut tx).await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn fetch_sellable_items(&self) -> Result<Vec<StoreItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        store_items::fetch_sellable(&mut conn).await
    }

    async fn fetch_store_item(&self, id: i64) -> Result<Option<StoreItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        store_items::fetch_by_id(id, &mut conn).await
    }

    async fn insert_store_item(&self, item: StoreItem) -> Result<StoreItem, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        store_items::insert(item, &mut conn).await
    }
}

impl RateStore for SqliteDatabase {
    async fn record_rate(&self, snapshot: &RateSnapshot) -> Result<(), RateStoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| RateStoreError::DatabaseError(e.to_string()))?;
        rates::record_rate(snapshot, &mut conn).await
    }

    async fn fetch_current_rate(&self) -> Result<RateSnapshot, RateStoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| RateStoreError::DatabaseError(e.to_string()))?;
        rates::fetch_latest_rate(&mut conn).await
    }
}
