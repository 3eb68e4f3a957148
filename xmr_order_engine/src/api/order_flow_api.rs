use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    api::errors::OrderFlowError,
    db_types::{DraftLine, NewOrder, Order, OrderDraft, StoreItem},
    traits::{AddressCipher, Ledger, OrderStore, OrderStoreError, RateStore},
};

/// How many fresh addresses to try before giving up on placement. Collisions mean the wallet is
/// handing out addresses that are still attached to open orders, which should not happen twice in
/// a row.
const MAX_ADDRESS_ATTEMPTS: usize = 3;

/// `OrderFlowApi` handles order placement and the fulfilment path.
pub struct OrderFlowApi<B, L> {
    db: B,
    wallet: L,
    cipher: Arc<dyn AddressCipher>,
    /// Fixed surcharge in US cents applied to every order at placement.
    processing_fee: i64,
}

impl<B, L> Debug for OrderFlowApi<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, L> OrderFlowApi<B, L>
where
    B: OrderStore + RateStore,
    L: Ledger,
{
    pub fn new(db: B, wallet: L, cipher: Arc<dyn AddressCipher>, processing_fee: i64) -> Self {
        Self { db, wallet, cipher, processing_fee }
    }

    /// Place a new order.
    ///
    /// The exchange rate is frozen from the current snapshot (placement fails with
    /// [`crate::traits::RateStoreError::NoRateAvailable`] if none exists), unit prices are frozen
    /// from the catalog, the mailing address is encrypted, and a fresh receiving address is
    /// issued. A receiving address that collides with an open order is discarded and a new one
    /// requested.
    pub async fn place_order(&self, order: NewOrder) -> Result<Order, OrderFlowError> {
        if order.items.is_empty() {
            return Err(OrderFlowError::EmptyOrder);
        }
        let rate = self.db.fetch_current_rate().await?;
        let mut lines = Vec::with_capacity(order.items.len());
        for line in &order.items {
            if line.quantity < 1 {
                return Err(OrderFlowError::InvalidQuantity(line.item_id));
            }
            let item = self
                .db
                .fetch_store_item(line.item_id)
                .await?
                .filter(|i| i.is_sellable())
                .ok_or(OrderFlowError::ItemNotSellable(line.item_id))?;
            lines.push(DraftLine { item_id: item.id, quantity: line.quantity, unit_price: item.price });
        }
        let ciphertext = self.cipher.encrypt(&order.mailing_address)?;
        for attempt in 1..=MAX_ADDRESS_ATTEMPTS {
            let address = self.wallet.issue_address().await?;
            let draft = OrderDraft {
                email: order.email.clone(),
                mailing_address: ciphertext.clone(),
                receiving_address: address,
                rate,
                processing_fee: self.processing_fee,
                items: lines.clone(),
            };
            match self.db.insert_order(draft).await {
                Ok(stored) => {
                    info!("🛒️ Order #{} placed by {} for {}", stored.id, stored.email, stored.expected_total());
                    return Ok(stored);
                },
                Err(OrderStoreError::AddressCollision) => {
                    warn!("🛒️ Receiving address collision on attempt {attempt}, requesting a new address");
                },
                Err(e) => return Err(e.into()),
            }
        }
        Err(OrderFlowError::AddressIssuanceFailed(MAX_ADDRESS_ATTEMPTS))
    }

    pub async fn order_by_id(&self, id: i64) -> Result<Option<Order>, OrderFlowError> {
        Ok(self.db.fetch_order(id).await?)
    }

    /// Catalog entries buyers can currently order.
    pub async fn sellable_items(&self) -> Result<Vec<StoreItem>, OrderFlowError> {
        Ok(self.db.fetch_sellable_items().await?)
    }

    /// Decrypt the mailing address of an order that still carries one. Used by the purchasing
    /// path before the ciphertext is discarded.
    pub async fn mailing_address(&self, id: i64) -> Result<Option<String>, OrderFlowError> {
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        order.mailing_address.as_deref().map(|ct| self.cipher.decrypt(ct)).transpose().map_err(Into::into)
    }

    /// `Paid → Purchased`. Discards the mailing-address ciphertext.
    pub async fn mark_order_purchased(&self, id: i64, at: DateTime<Utc>) -> Result<Order, OrderFlowError> {
        self.apply(id, |order| order.mark_purchased(at)).await
    }

    /// `Purchased → Arrived`.
    pub async fn mark_order_arrived(&self, id: i64, at: DateTime<Utc>) -> Result<Order, OrderFlowError> {
        self.apply(id, |order| order.mark_arrived(at)).await
    }

    /// `Arrived → Completed`.
    pub async fn mark_order_completed(&self, id: i64) -> Result<Order, OrderFlowError> {
        self.apply(id, |order| order.mark_completed()).await
    }

    /// Administrative drop to `Lost` from any non-terminal state.
    pub async fn mark_order_lost(&self, id: i64) -> Result<Order, OrderFlowError> {
        self.apply(id, |order| order.mark_lost()).await
    }

    /// Fetch, run a pure transition, and commit under the optimistic guard.
    async fn apply<F>(&self, id: i64, transition: F) -> Result<Order, OrderFlowError>
    where F: FnOnce(&Order) -> Result<Order, crate::db_types::TransitionError> {
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        let next = transition(&order)?;
        let stored = self.db.commit_transition(&order, &next).await?;
        debug!("🛒️ Order #{} moved to {}", stored.id, stored.state);
        Ok(stored)
    }
}
