use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xmr_order_engine::db_types::{Order, OrderLine, OrderState, RateSnapshot, StoreItem};
use xog_common::Piconero;

/// Storefront snapshot: what can be bought, and at what rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    pub rate: RateSnapshot,
    pub items: Vec<StoreItem>,
}

/// Public view of an order. The mailing-address ciphertext never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: i64,
    pub email: String,
    pub state: OrderState,
    pub receiving_address: Option<String>,
    pub payment_txid: Option<String>,
    pub total_cents: i64,
    pub expected_total: Piconero,
    pub rate: RateSnapshot,
    pub date_placed: DateTime<Utc>,
    pub date_paid: Option<DateTime<Utc>>,
    pub date_purchased: Option<DateTime<Utc>>,
    pub date_arrived: Option<DateTime<Utc>>,
    pub items: Vec<OrderLine>,
}

impl From<Order> for OrderResult {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            email: order.email.clone(),
            state: order.state,
            receiving_address: order.receiving_address.clone(),
            payment_txid: order.payment_txid.clone(),
            total_cents: order.total_cents(),
            expected_total: order.expected_total(),
            rate: order.rate_snapshot(),
            date_placed: order.date_placed,
            date_paid: order.date_paid,
            date_purchased: order.date_purchased,
            date_arrived: order.date_arrived,
            items: order.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedAddress {
    pub address: String,
}

/// Payment summary for one receiving address, as served by the address-info façade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    pub total_received: Piconero,
    pub last_txn_hash: Option<String>,
}
