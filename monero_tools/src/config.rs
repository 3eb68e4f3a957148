use log::*;
use xog_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct WalletRpcConfig {
    /// Base URL of the wallet RPC endpoint, e.g. `http://127.0.0.1:18083`.
    pub base_url: String,
    pub username: Option<String>,
    pub password: Secret<String>,
}

impl WalletRpcConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("XOG_WALLET_RPC_URL").unwrap_or_else(|_| {
            warn!("XOG_WALLET_RPC_URL not set, using http://127.0.0.1:18083");
            "http://127.0.0.1:18083".to_string()
        });
        let username = std::env::var("XOG_WALLET_RPC_USERNAME").ok();
        let password = Secret::new(std::env::var("XOG_WALLET_RPC_PASSWORD").unwrap_or_default());
        Self { base_url, username, password }
    }
}

#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the price API, e.g. `https://min-api.cryptocompare.com`.
    pub base_url: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { base_url: "https://min-api.cryptocompare.com".to_string() }
    }
}

impl OracleConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("XOG_PRICE_ORACLE_URL").unwrap_or_else(|_| {
            warn!("XOG_PRICE_ORACLE_URL not set, using min-api.cryptocompare.com");
            OracleConfig::default().base_url
        });
        Self { base_url }
    }
}
