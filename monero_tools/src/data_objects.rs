use serde::{Deserialize, Serialize};

/// Response of the wallet's `create_address` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAddress {
    pub address: String,
    pub address_index: u32,
}

/// Response of the wallet's `get_address_index` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubaddressIndex {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AddressIndexResponse {
    pub index: SubaddressIndex,
}

/// One confirmed incoming transfer as reported by `get_transfers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingTransfer {
    pub address: String,
    /// Amount in piconero.
    pub amount: u64,
    pub txid: String,
    pub height: u64,
    #[serde(default)]
    pub confirmations: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TransfersResponse {
    #[serde(rename = "in", default)]
    pub incoming: Vec<IncomingTransfer>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct HeightResponse {
    pub height: u64,
}
