use thiserror::Error;

use crate::db_types::{Order, OrderDraft, OrderState, StoreItem, TransitionError};

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("The order was modified concurrently and this update was rejected")]
    ConcurrentModification,
    #[error("The receiving address is already assigned to an open order")]
    AddressCollision,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Order-ledger backend contract.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Insert a priced order and its lines in a single atomic transaction, returning the stored
    /// order in state `Created`.
    ///
    /// Fails with [`OrderStoreError::AddressCollision`] if the draft's receiving address is
    /// already held by another order that is not terminal.
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, OrderStoreError>;

    /// Fetch one order with its lines.
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;

    /// Fetch every order in the given state, ordered by placement time, lines included.
    async fn fetch_orders_in_state(&self, state: OrderState) -> Result<Vec<Order>, OrderStoreError>;

    /// Persist a transition produced by the pure state machine.
    ///
    /// The update is optimistic: it only lands if the stored row still has `old`'s state and
    /// `updated_at`. A row that moved underneath the caller yields
    /// [`OrderStoreError::ConcurrentModification`] and nothing is written.
    async fn commit_transition(&self, old: &Order, new: &Order) -> Result<Order, OrderStoreError>;

    /// Catalog entries that buyers may currently order (visible and active).
    async fn fetch_sellable_items(&self) -> Result<Vec<StoreItem>, OrderStoreError>;

    /// Fetch a single catalog entry.
    async fn fetch_store_item(&self, id: i64) -> Result<Option<StoreItem>, OrderStoreError>;

    /// Add a catalog entry. Administrative path, also used to seed test stores.
    async fn insert_store_item(&self, item: StoreItem) -> Result<StoreItem, OrderStoreError>;
}
