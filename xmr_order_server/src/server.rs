use std::sync::Arc;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use log::*;
use monero_tools::{PriceOracle, WalletClient};
use xmr_order_engine::{
    traits::PassthroughCipher,
    ExchangeRateApi, OrderFlowApi, SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::RpcLedger,
    routes::{
        address_info, create_address, health, order_arrived, order_by_id, order_completed, order_lost,
        order_purchased, place_order, store_info,
    },
    workers::{start_rate_worker, start_reconcile_worker},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let wallet = WalletClient::new(config.wallet.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let ledger = RpcLedger::new(wallet);
    if config.run_workers {
        let oracle = PriceOracle::new(config.oracle.clone());
        start_reconcile_worker(db.clone(), ledger.clone(), config.clone());
        start_rate_worker(db.clone(), oracle, config.clone());
    } else {
        warn!("🪛️ Background workers are disabled. Reconciliation and rate refresh must be driven externally.");
    }
    let srv = create_server_instance(config, db, ledger)?;
    srv.await.map_err(ServerError::IOError)
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    ledger: RpcLedger,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let order_api =
            OrderFlowApi::new(db.clone(), ledger.clone(), Arc::new(PassthroughCipher), config.processing_fee);
        let rate_api = ExchangeRateApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(store_info)
            .service(place_order)
            .service(order_by_id)
            .service(order_purchased)
            .service(order_arrived)
            .service(order_completed)
            .service(order_lost)
            .service(create_address)
            .service(address_info);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("xog::access_log"))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(rate_api))
            .app_data(web::Data::new(ledger.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(api_scope)
    })
    .bind((host.as_str(), port))?
    .run();
    info!("🚀️ Server listening on {host}:{port}");
    Ok(srv)
}
