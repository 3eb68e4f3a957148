use std::{env, time::Duration};

use log::*;
use monero_tools::{OracleConfig, WalletRpcConfig};
use xog_common::parse_boolean_flag;

const DEFAULT_XOG_HOST: &str = "127.0.0.1";
const DEFAULT_XOG_PORT: u16 = 8370;
/// Fixed order surcharge in US cents.
const DEFAULT_PROCESSING_FEE: i64 = 150;
const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(120);
const DEFAULT_RATE_REFRESH_INTERVAL: Duration = Duration::from_secs(900);
/// How many blocks below the wallet tip reconciliation looks, so a run never races a re-org.
const DEFAULT_CONFIRMATION_DEPTH: u64 = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Surcharge in US cents applied to every order at placement.
    pub processing_fee: i64,
    pub reconcile_interval: Duration,
    pub rate_refresh_interval: Duration,
    /// Blocks subtracted from the wallet tip to obtain the reconciliation height ceiling.
    pub confirmation_depth: u64,
    /// Fixed height ceiling override. When set, every run reconciles against this exact height,
    /// which makes runs reproducible against one ledger snapshot.
    pub max_height: Option<u64>,
    /// Set to false to run the HTTP surface without the background workers, e.g. when
    /// reconciliation is driven externally on a schedule.
    pub run_workers: bool,
    pub wallet: WalletRpcConfig,
    pub oracle: OracleConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_XOG_HOST.to_string(),
            port: DEFAULT_XOG_PORT,
            database_url: String::default(),
            processing_fee: DEFAULT_PROCESSING_FEE,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            rate_refresh_interval: DEFAULT_RATE_REFRESH_INTERVAL,
            confirmation_depth: DEFAULT_CONFIRMATION_DEPTH,
            max_height: None,
            run_workers: true,
            wallet: WalletRpcConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("XOG_HOST").ok().unwrap_or_else(|| DEFAULT_XOG_HOST.into());
        let port = env::var("XOG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for XOG_PORT. {e} Using the default, {DEFAULT_XOG_PORT}, instead.");
                    DEFAULT_XOG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_XOG_PORT);
        let database_url = env::var("XOG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ XOG_DATABASE_URL is not set. Please set it to the URL for the order database.");
            String::default()
        });
        let processing_fee = parse_env_u64("XOG_PROCESSING_FEE_CENTS", DEFAULT_PROCESSING_FEE as u64) as i64;
        let reconcile_interval =
            Duration::from_secs(parse_env_u64("XOG_RECONCILE_INTERVAL_SECS", DEFAULT_RECONCILE_INTERVAL.as_secs()));
        let rate_refresh_interval = Duration::from_secs(parse_env_u64(
            "XOG_RATE_REFRESH_INTERVAL_SECS",
            DEFAULT_RATE_REFRESH_INTERVAL.as_secs(),
        ));
        let confirmation_depth = parse_env_u64("XOG_CONFIRMATION_DEPTH", DEFAULT_CONFIRMATION_DEPTH);
        let max_height = env::var("XOG_MAX_HEIGHT").ok().and_then(|s| {
            s.parse::<u64>()
                .map_err(|e| {
                    error!("🪛️ {s} is not a valid height for XOG_MAX_HEIGHT. {e} Ignoring the override.");
                })
                .ok()
        });
        let run_workers = parse_boolean_flag(env::var("XOG_RUN_WORKERS").ok(), true);
        Self {
            host,
            port,
            database_url,
            processing_fee,
            reconcile_interval,
            rate_refresh_interval,
            confirmation_depth,
            max_height,
            run_workers,
            wallet: WalletRpcConfig::new_from_env_or_default(),
            oracle: OracleConfig::new_from_env_or_default(),
        }
    }
}

fn parse_env_u64(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(s) => s.parse::<u64>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {var}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8370);
        assert_eq!(config.confirmation_depth, 10);
        assert!(config.max_height.is_none());
        assert!(config.run_workers);
    }
}
