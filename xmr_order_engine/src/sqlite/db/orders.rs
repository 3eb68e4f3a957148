use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Order, OrderDraft, OrderLine, OrderState},
    traits::OrderStoreError,
};

/// Inserts a priced order and its lines. Not atomic on its own; run it inside a transaction and
/// pass `&mut *tx` as the connection argument.
///
/// Address uniqueness among open orders is checked here, backed by the unique index on
/// `receiving_address` as a second line of defence.
pub async fn insert_order(draft: OrderDraft, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let clash: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM orders WHERE receiving_address = $1 AND state NOT IN ('Completed', 'Lost') LIMIT 1",
    )
    .bind(draft.receiving_address.clone())
    .fetch_optional(&mut *conn)
    .await?;
    if clash.is_some() {
        return Err(OrderStoreError::AddressCollision);
    }
    let now = Utc::now();
    let mut order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                email,
                state,
                mailing_address,
                receiving_address,
                rate,
                rate_recorded_at,
                processing_fee,
                date_placed,
                updated_at
            ) VALUES ($1, 'Created', $2, $3, $4, $5, $6, $7, $7)
            RETURNING *;
        "#,
    )
    .bind(draft.email)
    .bind(draft.mailing_address)
    .bind(draft.receiving_address)
    .bind(draft.rate.rate.value())
    .bind(draft.rate.recorded_at)
    .bind(draft.processing_fee)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.message().contains("receiving_address") => OrderStoreError::AddressCollision,
        _ => OrderStoreError::from(e),
    })?;
    for line in draft.items {
        sqlx::query("INSERT INTO order_lines (order_id, item_id, quantity, unit_price) VALUES ($1, $2, $3, $4)")
            .bind(order.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    order.items = fetch_lines(order.id, conn).await?;
    debug!("📝️ Order #{} inserted with {} lines", order.id, order.items.len());
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, OrderStoreError> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
    match order {
        Some(mut order) => {
            order.items = fetch_lines(order.id, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}

/// Orders in the given state, oldest placement first.
pub async fn fetch_orders_in_state(
    state: OrderState,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderStoreError> {
    let mut orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE state = $1 ORDER BY date_placed ASC, id ASC")
            .bind(state.to_string())
            .fetch_all(&mut *conn)
            .await?;
    for order in &mut orders {
        order.items = fetch_lines(order.id, &mut *conn).await?;
    }
    Ok(orders)
}

/// Persists a state transition. The UPDATE lands only if the row still carries the state and
/// `updated_at` the caller read; otherwise another writer won and
/// [`OrderStoreError::ConcurrentModification`] is returned.
pub async fn commit_transition(old: &Order, new: &Order, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                state = $1,
                mailing_address = $2,
                receiving_address = $3,
                payment_txid = $4,
                date_paid = $5,
                date_purchased = $6,
                date_arrived = $7,
                updated_at = $8
            WHERE id = $9 AND state = $10 AND updated_at = $11
            RETURNING *;
        "#,
    )
    .bind(new.state.to_string())
    .bind(new.mailing_address.clone())
    .bind(new.receiving_address.clone())
    .bind(new.payment_txid.clone())
    .bind(new.date_paid)
    .bind(new.date_purchased)
    .bind(new.date_arrived)
    .bind(Utc::now())
    .bind(old.id)
    .bind(old.state.to_string())
    .bind(old.updated_at)
    .fetch_optional(&mut *conn)
    .await?;
    match result {
        Some(mut stored) => {
            stored.items = fetch_lines(stored.id, conn).await?;
            Ok(stored)
        },
        None => Err(OrderStoreError::ConcurrentModification),
    }
}

pub async fn fetch_lines(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, OrderStoreError> {
    let lines = sqlx::query_as("SELECT * FROM order_lines WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(lines)
}
