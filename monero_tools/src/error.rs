use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletRpcError {
    #[error("Could not initialize wallet client: {0}")]
    Initialization(String),
    #[error("Wallet RPC request failed: {0}")]
    RequestError(String),
    #[error("Wallet RPC returned error {code}: {message}")]
    RpcError { code: i64, message: String },
    #[error("Could not deserialize wallet response: {0}")]
    JsonError(String),
    #[error("The wallet has no record of address {0}")]
    AddressNotFound(String),
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Price oracle request failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize oracle response: {0}")]
    JsonError(String),
    #[error("The oracle response did not contain an XMR rate")]
    MissingRate,
}
