use xmr_order_engine::traits::{Ledger, LedgerError};

use crate::config::ServerConfig;

/// The height ceiling a reconciliation or address query should use: the configured fixed
/// override if there is one, otherwise the wallet tip minus the confirmation depth.
pub async fn effective_max_height<L: Ledger>(ledger: &L, config: &ServerConfig) -> Result<u64, LedgerError> {
    if let Some(height) = config.max_height {
        return Ok(height);
    }
    let tip = ledger.height().await?;
    Ok(tip.saturating_sub(config.confirmation_depth))
}
