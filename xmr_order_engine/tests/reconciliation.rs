mod support;

use support::*;
use xmr_order_engine::{
    db_types::OrderState,
    test_utils::MemoryLedger,
    traits::OrderStore,
};
use xog_common::Piconero;

#[tokio::test]
async fn underpayment_leaves_the_order_pending() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;
    let address = order.receiving_address.clone().unwrap();
    let expected = order.expected_total();

    // One piconero short is still short.
    ledger.credit(&address, expected - Piconero::from(1), "txn-short", 90);
    let summary = reconciler(&db, &ledger).reconcile(100).await.unwrap();
    assert_eq!(summary.scanned, 1);
    assert!(summary.paid.is_empty());
    assert_eq!(summary.awaiting_payment, 1);

    let stored = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.state, OrderState::Created);
    assert!(stored.receiving_address.is_some());
}

#[tokio::test]
async fn exact_payment_settles_with_the_latest_txid() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;
    let address = order.receiving_address.clone().unwrap();
    let expected = order.expected_total();

    let half = Piconero::from(expected.value() / 2);
    ledger.credit(&address, half, "txn-early", 80);
    ledger.credit(&address, expected - half, "txn-late", 95);

    let summary = reconciler(&db, &ledger).reconcile(100).await.unwrap();
    assert_eq!(summary.paid.len(), 1);

    let stored = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.state, OrderState::Paid);
    // The most recent qualifying payment is the settling reference.
    assert_eq!(stored.payment_txid.as_deref(), Some("txn-late"));
    assert!(stored.receiving_address.is_none());
    assert!(stored.date_paid.is_some());
    assert!(stored.mailing_address.is_some());
}

#[tokio::test]
async fn overpayment_also_settles() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 500, 3).await;
    let address = order.receiving_address.clone().unwrap();

    ledger.credit(&address, order.expected_total() + Piconero::from_xmr(1), "txn-generous", 40);
    let summary = reconciler(&db, &ledger).reconcile(50).await.unwrap();
    assert_eq!(summary.paid.len(), 1);
    assert_eq!(summary.paid[0].payment_txid.as_deref(), Some("txn-generous"));
}

#[tokio::test]
async fn reconcile_is_idempotent_at_a_fixed_height() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 2).await;
    ledger.credit(&order.receiving_address.clone().unwrap(), order.expected_total(), "txn-full", 70);

    let engine = reconciler(&db, &ledger);
    let first = engine.reconcile(100).await.unwrap();
    assert_eq!(first.paid.len(), 1);
    let after_first = db.fetch_order(order.id).await.unwrap().unwrap();

    let second = engine.reconcile(100).await.unwrap();
    assert!(second.paid.is_empty());
    assert_eq!(second.scanned, 0);
    let after_second = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn the_height_ceiling_hides_later_payments() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;
    ledger.credit(&order.receiving_address.clone().unwrap(), order.expected_total(), "txn-tip", 150);

    let engine = reconciler(&db, &ledger);
    let early = engine.reconcile(100).await.unwrap();
    assert!(early.paid.is_empty());
    assert_eq!(db.fetch_order(order.id).await.unwrap().unwrap().state, OrderState::Created);

    let later = engine.reconcile(200).await.unwrap();
    assert_eq!(later.paid.len(), 1);
    assert_eq!(db.fetch_order(order.id).await.unwrap().unwrap().state, OrderState::Paid);
}

#[tokio::test]
async fn one_bad_order_never_blocks_the_batch() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;

    // Placed in this order, reconciled in this order.
    let broken = place_simple_order(&db, &ledger, 1000, 1).await;
    let funded = place_simple_order(&db, &ledger, 2000, 1).await;
    let unfunded = place_simple_order(&db, &ledger, 3000, 1).await;

    ledger.break_address(&broken.receiving_address.clone().unwrap());
    ledger.credit(&funded.receiving_address.clone().unwrap(), funded.expected_total(), "txn-ok", 60);

    let summary = reconciler(&db, &ledger).reconcile(100).await.unwrap();
    assert_eq!(summary.scanned, 3);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.awaiting_payment, 1);
    assert_eq!(summary.paid.len(), 1);
    assert_eq!(summary.paid[0].id, funded.id);

    assert_eq!(db.fetch_order(broken.id).await.unwrap().unwrap().state, OrderState::Created);
    assert_eq!(db.fetch_order(funded.id).await.unwrap().unwrap().state, OrderState::Paid);
    assert_eq!(db.fetch_order(unfunded.id).await.unwrap().unwrap().state, OrderState::Created);
}
