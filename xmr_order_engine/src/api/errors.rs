use thiserror::Error;

use crate::{
    db_types::TransitionError,
    traits::{CipherError, LedgerError, OrderStoreError, RateStoreError},
};

#[derive(Debug, Error)]
pub enum OrderFlowError {
    #[error(transparent)]
    Store(#[from] OrderStoreError),
    #[error(transparent)]
    Rate(#[from] RateStoreError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("An order must contain at least one line item")]
    EmptyOrder,
    #[error("Store item {0} is not currently sellable")]
    ItemNotSellable(i64),
    #[error("Quantity for store item {0} must be at least 1")]
    InvalidQuantity(i64),
    #[error("Could not obtain an unused receiving address after {0} attempts")]
    AddressIssuanceFailed(usize),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
}

impl From<TransitionError> for OrderFlowError {
    fn from(e: TransitionError) -> Self {
        Self::Store(OrderStoreError::Transition(e))
    }
}
