#![allow(dead_code)]
use std::sync::Arc;

use chrono::Utc;
use xmr_order_engine::{
    db_types::{NewOrder, NewOrderLine, Order, RateSnapshot, StoreItem},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        MemoryLedger,
    },
    traits::{OrderStore, PassthroughCipher, RateStore},
    ExchangeRateApi, OrderFlowApi, ReconcileApi, SqliteDatabase,
};
use xog_common::Piconero;

/// Processing fee applied by the test order flow, in US cents.
pub const FEE_CENTS: i64 = 150;
/// Default test exchange rate, in piconero per US cent.
pub const RATE_PER_CENT: i64 = 2_000_000_000;

pub async fn new_store() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn seed_item(db: &SqliteDatabase, title: &str, price: i64) -> StoreItem {
    let item = StoreItem {
        id: 0,
        title: title.to_string(),
        description: format!("{title} (test stock)"),
        supplier_url: "https://supplier.example/catalog".to_string(),
        price,
        visible: true,
        active: true,
        date_added: Utc::now(),
    };
    db.insert_store_item(item).await.expect("Error seeding store item")
}

pub async fn record_rate(db: &SqliteDatabase, per_cent: i64) {
    db.record_rate(&RateSnapshot::new(Piconero::from(per_cent), None)).await.expect("Error recording rate")
}

pub fn order_flow(db: &SqliteDatabase, ledger: &MemoryLedger) -> OrderFlowApi<SqliteDatabase, MemoryLedger> {
    OrderFlowApi::new(db.clone(), ledger.clone(), Arc::new(PassthroughCipher), FEE_CENTS)
}

pub fn reconciler(db: &SqliteDatabase, ledger: &MemoryLedger) -> ReconcileApi<SqliteDatabase, MemoryLedger> {
    ReconcileApi::new(db.clone(), ledger.clone())
}

pub fn rate_api(db: &SqliteDatabase) -> ExchangeRateApi<SqliteDatabase> {
    ExchangeRateApi::new(db.clone())
}

/// Seed one item and place an order for `quantity` of it at the default rate.
pub async fn place_simple_order(db: &SqliteDatabase, ledger: &MemoryLedger, price: i64, quantity: i64) -> Order {
    let item = seed_item(db, "widget", price).await;
    let api = order_flow(db, ledger);
    let order = NewOrder {
        email: "buyer@example.com".to_string(),
        mailing_address: "1 Main St, Springfield".to_string(),
        items: vec![NewOrderLine { item_id: item.id, quantity }],
    };
    api.place_order(order).await.expect("Error placing order")
}
