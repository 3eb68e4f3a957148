//! The ExchangeRateApi wraps the append-only snapshot store. Orders freeze the snapshot they are
//! placed under; nothing here ever touches an existing order.

use std::fmt::Debug;

use crate::{
    db_types::RateSnapshot,
    traits::{RateStore, RateStoreError},
};

pub struct ExchangeRateApi<B> {
    db: B,
}

impl<B> Debug for ExchangeRateApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExchangeRateApi")
    }
}

impl<B> ExchangeRateApi<B>
where B: RateStore
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn record_rate(&self, snapshot: &RateSnapshot) -> Result<(), RateStoreError> {
        self.db.record_rate(snapshot).await
    }

    pub async fn current_rate(&self) -> Result<RateSnapshot, RateStoreError> {
        self.db.fetch_current_rate().await
    }
}
