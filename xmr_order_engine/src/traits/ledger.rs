use thiserror::Error;
use xog_common::Piconero;

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("The ledger has no record of address {0}")]
    UnknownAddress(String),
    #[error("Ledger service unavailable: {0}")]
    Unavailable(String),
}

/// A confirmed incoming payment as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPayment {
    pub txid: String,
    pub amount: Piconero,
    pub height: u64,
}

/// Boundary to the external system of record for confirmed payments.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Request one never-before-returned receiving address.
    async fn issue_address(&self) -> Result<String, LedgerError>;

    /// Confirmed incoming payments to `address`, bounded by `max_height` and ordered oldest
    /// first. The height ceiling keeps a reconciliation run reproducible against a fixed view of
    /// the chain.
    async fn incoming_payments(&self, address: &str, max_height: u64) -> Result<Vec<LedgerPayment>, LedgerError>;

    /// The ledger's current height.
    async fn height(&self) -> Result<u64, LedgerError>;
}
