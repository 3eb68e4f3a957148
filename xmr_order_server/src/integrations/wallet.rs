use monero_tools::{WalletClient, WalletRpcError};
use xmr_order_engine::traits::{Ledger, LedgerError, LedgerPayment};
use xog_common::Piconero;

/// [`Ledger`] implementation backed by the wallet RPC.
#[derive(Clone)]
pub struct RpcLedger {
    wallet: WalletClient,
}

impl RpcLedger {
    pub fn new(wallet: WalletClient) -> Self {
        Self { wallet }
    }
}

impl Ledger for RpcLedger {
    async fn issue_address(&self) -> Result<String, LedgerError> {
        let created = self.wallet.create_address().await.map_err(into_ledger_error)?;
        Ok(created.address)
    }

    async fn incoming_payments(&self, address: &str, max_height: u64) -> Result<Vec<LedgerPayment>, LedgerError> {
        let transfers = self.wallet.incoming_transfers(address, max_height).await.map_err(into_ledger_error)?;
        transfers
            .into_iter()
            .map(|t| {
                let amount = Piconero::try_from(t.amount)
                    .map_err(|e| LedgerError::Unavailable(format!("transfer {} has a bad amount: {e}", t.txid)))?;
                Ok(LedgerPayment { txid: t.txid, amount, height: t.height })
            })
            .collect()
    }

    async fn height(&self) -> Result<u64, LedgerError> {
        self.wallet.get_height().await.map_err(into_ledger_error)
    }
}

fn into_ledger_error(e: WalletRpcError) -> LedgerError {
    match e {
        WalletRpcError::AddressNotFound(address) => LedgerError::UnknownAddress(address),
        other => LedgerError::Unavailable(other.to_string()),
    }
}
