use std::fmt::Debug;

use chrono::Utc;
use log::*;
use xog_common::Piconero;

use crate::{
    api::errors::OrderFlowError,
    db_types::{Order, OrderState, TransitionError},
    traits::{Ledger, OrderStore},
};

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileSummary {
    /// Orders in `Created` that were visited.
    pub scanned: usize,
    /// Orders that transitioned to `Paid` this run.
    pub paid: Vec<Order>,
    /// Orders whose confirmed payments do not yet cover the expected total.
    pub awaiting_payment: usize,
    /// Orders skipped because of a per-order failure (ledger query, validation, concurrent
    /// writer). They are retried on the next run.
    pub failures: usize,
}

/// `ReconcileApi` brings the order ledger in line with ledger reality.
///
/// One run visits every `Created` order in placement order and pays those whose receiving address
/// has collected enough confirmed funds below the height ceiling. Each order is its own atomic
/// unit: a failure or an insufficient balance never blocks the rest of the batch, and a run
/// aborted between orders simply resumes on the next schedule because only `Created` orders are
/// ever revisited.
pub struct ReconcileApi<B, L> {
    db: B,
    wallet: L,
}

impl<B, L> Debug for ReconcileApi<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcileApi")
    }
}

impl<B, L> ReconcileApi<B, L>
where
    B: OrderStore,
    L: Ledger,
{
    pub fn new(db: B, wallet: L) -> Self {
        Self { db, wallet }
    }

    /// Run one reconciliation pass against the ledger as of `as_of_height`.
    ///
    /// Running the same pass twice at the same height is a no-op the second time: paid orders are
    /// no longer in `Created`, and the commit itself is guarded on the state the run observed.
    pub async fn reconcile(&self, as_of_height: u64) -> Result<ReconcileSummary, OrderFlowError> {
        let pending = self.db.fetch_orders_in_state(OrderState::Created).await?;
        let mut summary = ReconcileSummary { scanned: pending.len(), ..Default::default() };
        info!("⚖️ Reconciling {} pending orders against ledger height {as_of_height}", pending.len());
        for order in pending {
            match self.reconcile_order(&order, as_of_height).await {
                Ok(Some(paid)) => {
                    info!("⚖️ Order #{} paid by txn {}", paid.id, paid.payment_txid.as_deref().unwrap_or("?"));
                    summary.paid.push(paid);
                },
                Ok(None) => summary.awaiting_payment += 1,
                Err(e) => {
                    // One bad order must never starve the rest of the batch.
                    warn!("⚖️ Order #{} skipped this run: {e}", order.id);
                    summary.failures += 1;
                },
            }
        }
        info!(
            "⚖️ Reconciliation done. {} paid, {} awaiting payment, {} failures",
            summary.paid.len(),
            summary.awaiting_payment,
            summary.failures
        );
        Ok(summary)
    }

    /// Reconcile a single order. `Ok(Some(order))` if it was paid, `Ok(None)` if its balance is
    /// still short.
    pub async fn reconcile_order(&self, order: &Order, as_of_height: u64) -> Result<Option<Order>, OrderFlowError> {
        let address = order.receiving_address.as_deref().ok_or_else(|| {
            TransitionError::InvariantViolation("a pending order must carry a receiving address".into())
        })?;
        let payments = self.wallet.incoming_payments(address, as_of_height).await?;
        let received: Piconero = payments.iter().map(|p| p.amount).sum();
        let expected = order.expected_total();
        trace!(
            "⚖️ Order #{}: expected {expected}, received {received} over {} payments",
            order.id,
            payments.len()
        );
        if received < expected {
            return Ok(None);
        }
        // The most recent payment settles the order.
        let settling = match payments.last() {
            Some(p) => p,
            None => return Ok(None),
        };
        let paid = order.mark_paid(&settling.txid, Utc::now())?;
        let stored = self.db.commit_transition(order, &paid).await?;
        Ok(Some(stored))
    }
}
