use sqlx::SqliteConnection;

use crate::{db_types::RateSnapshot, traits::RateStoreError};

/// Appends a snapshot. The table is append-only; there is no update path.
pub async fn record_rate(snapshot: &RateSnapshot, conn: &mut SqliteConnection) -> Result<(), RateStoreError> {
    sqlx::query("INSERT INTO rate_snapshots (rate, recorded_at) VALUES ($1, $2)")
        .bind(snapshot.rate.value())
        .bind(snapshot.recorded_at)
        .execute(conn)
        .await
        .map_err(|e| RateStoreError::DatabaseError(e.to_string()))?;
    Ok(())
}

/// The snapshot with the latest timestamp.
pub async fn fetch_latest_rate(conn: &mut SqliteConnection) -> Result<RateSnapshot, RateStoreError> {
    sqlx::query_as::<_, RateSnapshot>(
        "SELECT rate, recorded_at FROM rate_snapshots ORDER BY recorded_at DESC, id DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await
    .map_err(|e| RateStoreError::DatabaseError(e.to_string()))?
    .ok_or(RateStoreError::NoRateAvailable)
}
