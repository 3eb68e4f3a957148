use thiserror::Error;

use crate::db_types::RateSnapshot;

#[derive(Debug, Clone, Error)]
pub enum RateStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No exchange rate has been recorded yet")]
    NoRateAvailable,
}

/// Append-only store of exchange-rate snapshots.
#[allow(async_fn_in_trait)]
pub trait RateStore {
    /// Append a snapshot. Existing snapshots are never overwritten or deleted.
    async fn record_rate(&self, snapshot: &RateSnapshot) -> Result<(), RateStoreError>;

    /// The snapshot with the latest timestamp, or [`RateStoreError::NoRateAvailable`] if none has
    /// been recorded. Callers must fail rather than fall back to a stale or zero rate.
    async fn fetch_current_rate(&self) -> Result<RateSnapshot, RateStoreError>;
}
