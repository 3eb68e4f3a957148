mod support;

use chrono::Utc;
use support::*;
use xmr_order_engine::{
    db_types::{NewOrder, NewOrderLine, OrderState},
    test_utils::MemoryLedger,
    traits::{OrderStore, OrderStoreError, RateStoreError},
    OrderFlowError,
};
use xog_common::Piconero;

#[tokio::test]
async fn placement_freezes_rate_and_prices() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1250, 2).await;

    assert_eq!(order.state, OrderState::Created);
    assert_eq!(order.total_cents(), 2 * 1250 + FEE_CENTS);
    let frozen_total = order.expected_total();
    assert_eq!(frozen_total, Piconero::from((2 * 1250 + FEE_CENTS) * RATE_PER_CENT));

    // Catalog and rate both move after placement; the order must not.
    seed_item(&db, "widget mk2", 99_999).await;
    record_rate(&db, RATE_PER_CENT * 10).await;
    let reloaded = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.expected_total(), frozen_total);
    assert_eq!(reloaded.items[0].unit_price, 1250);
}

#[tokio::test]
async fn placement_fails_without_a_rate_snapshot() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    let item = seed_item(&db, "widget", 1000).await;
    let api = order_flow(&db, &ledger);
    let order = NewOrder {
        email: "buyer@example.com".to_string(),
        mailing_address: "somewhere".to_string(),
        items: vec![NewOrderLine { item_id: item.id, quantity: 1 }],
    };
    let err = api.place_order(order).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::Rate(RateStoreError::NoRateAvailable)));
}

#[tokio::test]
async fn placement_rejects_bad_line_items() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let sellable = seed_item(&db, "widget", 1000).await;
    let hidden = {
        let mut item = seed_item(&db, "retired widget", 1000).await;
        item.id = 0;
        item.active = false;
        db.insert_store_item(item).await.unwrap()
    };
    let api = order_flow(&db, &ledger);

    let empty = NewOrder { email: "b@example.com".into(), mailing_address: "x".into(), items: vec![] };
    assert!(matches!(api.place_order(empty).await.unwrap_err(), OrderFlowError::EmptyOrder));

    let unsellable = NewOrder {
        email: "b@example.com".into(),
        mailing_address: "x".into(),
        items: vec![NewOrderLine { item_id: hidden.id, quantity: 1 }],
    };
    assert!(matches!(api.place_order(unsellable).await.unwrap_err(), OrderFlowError::ItemNotSellable(id) if id == hidden.id));

    let unknown = NewOrder {
        email: "b@example.com".into(),
        mailing_address: "x".into(),
        items: vec![NewOrderLine { item_id: 9999, quantity: 1 }],
    };
    assert!(matches!(api.place_order(unknown).await.unwrap_err(), OrderFlowError::ItemNotSellable(9999)));

    let zero_qty = NewOrder {
        email: "b@example.com".into(),
        mailing_address: "x".into(),
        items: vec![NewOrderLine { item_id: sellable.id, quantity: 0 }],
    };
    assert!(matches!(api.place_order(zero_qty).await.unwrap_err(), OrderFlowError::InvalidQuantity(id) if id == sellable.id));
}

#[tokio::test]
async fn colliding_addresses_trigger_reissuance() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let first = place_simple_order(&db, &ledger, 1000, 1).await;
    let taken = first.receiving_address.clone().unwrap();

    // The wallet misbehaves and hands out the same subaddress again.
    ledger.queue_address(&taken);
    let second = place_simple_order(&db, &ledger, 2000, 1).await;
    let fresh = second.receiving_address.clone().unwrap();
    assert_ne!(taken, fresh);
    assert_eq!(db.fetch_orders_in_state(OrderState::Created).await.unwrap().len(), 2);
}

#[tokio::test]
async fn stale_writers_are_rejected_at_commit() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;

    // Two actors read the same snapshot of the order and race to pay it.
    let first = order.mark_paid("txn-first", Utc::now()).unwrap();
    let second = order.mark_paid("txn-second", Utc::now()).unwrap();

    let winner = db.commit_transition(&order, &first).await.unwrap();
    assert_eq!(winner.state, OrderState::Paid);
    let err = db.commit_transition(&order, &second).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::ConcurrentModification));

    let stored = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.payment_txid.as_deref(), Some("txn-first"));
}

#[tokio::test]
async fn fulfilment_walks_the_forward_path() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;
    let api = order_flow(&db, &ledger);

    // Not paid yet: purchasing is an invalid transition and the stored order is untouched.
    let err = api.mark_order_purchased(order.id, Utc::now()).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::Store(OrderStoreError::Transition(_))));
    let untouched = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(untouched, order);

    let paid = order.mark_paid("txn-1", Utc::now()).unwrap();
    let paid = db.commit_transition(&order, &paid).await.unwrap();
    assert_eq!(api.mailing_address(order.id).await.unwrap().as_deref(), Some("1 Main St, Springfield"));

    let purchased = api.mark_order_purchased(paid.id, Utc::now()).await.unwrap();
    assert_eq!(purchased.state, OrderState::Purchased);
    assert!(purchased.mailing_address.is_none());
    assert_eq!(api.mailing_address(order.id).await.unwrap(), None);

    let arrived = api.mark_order_arrived(paid.id, Utc::now()).await.unwrap();
    assert_eq!(arrived.state, OrderState::Arrived);
    let completed = api.mark_order_completed(paid.id).await.unwrap();
    assert_eq!(completed.state, OrderState::Completed);
}

#[tokio::test]
async fn any_open_order_can_be_lost() {
    let db = new_store().await;
    let ledger = MemoryLedger::new();
    record_rate(&db, RATE_PER_CENT).await;
    let order = place_simple_order(&db, &ledger, 1000, 1).await;
    let api = order_flow(&db, &ledger);

    let lost = api.mark_order_lost(order.id).await.unwrap();
    assert_eq!(lost.state, OrderState::Lost);
    assert!(lost.receiving_address.is_none());
    assert!(lost.mailing_address.is_none());

    let err = api.mark_order_lost(order.id).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::Store(OrderStoreError::Transition(_))));
}
