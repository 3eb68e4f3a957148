//! Clients for the two external services the gateway consumes: the `monero-wallet-rpc` endpoint
//! that is the system of record for confirmed payments, and the fiat price oracle used to record
//! exchange-rate snapshots.
mod config;
mod data_objects;
mod error;
mod price_oracle;
mod wallet;

pub use config::{OracleConfig, WalletRpcConfig};
pub use data_objects::{CreatedAddress, IncomingTransfer, SubaddressIndex};
pub use error::{OracleError, WalletRpcError};
pub use price_oracle::PriceOracle;
pub use wallet::WalletClient;
