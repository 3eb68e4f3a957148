//! Background jobs: the periodic payment-reconciliation pass and the exchange-rate refresh.
use log::*;
use monero_tools::PriceOracle;
use tokio::task::JoinHandle;
use xmr_order_engine::{
    db_types::RateSnapshot,
    ExchangeRateApi, ReconcileApi, SqliteDatabase,
};

use crate::{config::ServerConfig, helpers::effective_max_height, integrations::RpcLedger};

/// Starts the reconciliation worker. Do not await the returned JoinHandle, as it will run
/// indefinitely.
pub fn start_reconcile_worker(db: SqliteDatabase, ledger: RpcLedger, config: ServerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let api = ReconcileApi::new(db, ledger.clone());
        let mut timer = tokio::time::interval(config.reconcile_interval);
        info!("⚖️ Payment reconciliation worker started");
        loop {
            timer.tick().await;
            let max_height = match effective_max_height(&ledger, &config).await {
                Ok(h) => h,
                Err(e) => {
                    error!("⚖️ Could not determine the reconciliation height ceiling: {e}");
                    continue;
                },
            };
            match api.reconcile(max_height).await {
                Ok(summary) => {
                    info!(
                        "⚖️ Reconciled {} orders at height {max_height}: {} paid, {} awaiting payment, {} failures",
                        summary.scanned,
                        summary.paid.len(),
                        summary.awaiting_payment,
                        summary.failures
                    );
                },
                Err(e) => {
                    error!("⚖️ Error running the reconciliation pass: {e}");
                },
            }
        }
    })
}

/// Starts the rate-refresh worker. An oracle failure aborts only that refresh; orders already
/// placed keep their frozen snapshots and reconciliation is never blocked.
pub fn start_rate_worker(db: SqliteDatabase, oracle: PriceOracle, config: ServerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let api = ExchangeRateApi::new(db);
        let mut timer = tokio::time::interval(config.rate_refresh_interval);
        info!("💱️ Exchange-rate worker started");
        loop {
            timer.tick().await;
            let rate = match oracle.fetch_xmr_per_usd().await {
                Ok(rate) => rate,
                Err(e) => {
                    error!("💱️ Rate refresh aborted: {e}");
                    continue;
                },
            };
            let snapshot = RateSnapshot::from_xmr_per_usd(rate);
            match api.record_rate(&snapshot).await {
                Ok(()) => info!("💱️ Recorded snapshot {snapshot}"),
                Err(e) => error!("💱️ Could not record rate snapshot: {e}"),
            }
        }
    })
}
