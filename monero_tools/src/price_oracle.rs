use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde_json::Value;

use crate::{config::OracleConfig, OracleError};

/// Client for the fiat price API. One call, one number: how many XMR one USD buys right now.
#[derive(Clone)]
pub struct PriceOracle {
    config: OracleConfig,
    client: Arc<Client>,
}

impl PriceOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self { config, client: Arc::new(Client::new()) }
    }

    pub async fn fetch_xmr_per_usd(&self) -> Result<f64, OracleError> {
        let url = format!("{}/data/price", self.config.base_url);
        debug!("Querying price oracle at {url}");
        let response = self
            .client
            .get(url)
            .query(&[("fsym", "USD"), ("tsyms", "XMR")])
            .send()
            .await
            .map_err(|e| OracleError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(OracleError::RequestError(format!("oracle returned HTTP {}", response.status())));
        }
        let body: Value = response.json().await.map_err(|e| OracleError::JsonError(e.to_string()))?;
        let rate = parse_rate(&body)?;
        info!("Oracle quotes {rate} XMR/USD");
        Ok(rate)
    }
}

fn parse_rate(body: &Value) -> Result<f64, OracleError> {
    body.get("XMR").and_then(Value::as_f64).filter(|r| *r > 0.0).ok_or(OracleError::MissingRate)
}
