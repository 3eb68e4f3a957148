//! Adapters between the engine's service traits and the concrete clients in `monero_tools`.
mod wallet;

pub use wallet::RpcLedger;
