//! Request handler definitions.
//!
//! Handlers stay thin: deserialize, call the engine API, map the result. Anything longer lives in
//! the engine or in [`crate::helpers`].
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use xmr_order_engine::{
    db_types::NewOrder,
    traits::Ledger,
    ExchangeRateApi, OrderFlowApi, SqliteDatabase,
};
use xog_common::Piconero;

use crate::{
    config::ServerConfig,
    data_objects::{AddressInfo, IssuedAddress, OrderResult, StoreInfo},
    errors::ServerError,
    helpers::effective_max_height,
    integrations::RpcLedger,
};

/// The concrete order-flow API the handlers are bound to.
pub type OrderApi = OrderFlowApi<SqliteDatabase, RpcLedger>;
pub type RateApi = ExchangeRateApi<SqliteDatabase>;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("👍️\n")
}

/// What is for sale, plus the snapshot buyers will be quoted at.
#[get("/store")]
pub async fn store_info(api: web::Data<OrderApi>, rates: web::Data<RateApi>) -> Result<HttpResponse, ServerError> {
    let rate = rates.current_rate().await?;
    let items = api.sellable_items().await?;
    Ok(HttpResponse::Ok().json(StoreInfo { rate, items }))
}

#[post("/orders")]
pub async fn place_order(api: web::Data<OrderApi>, body: web::Json<NewOrder>) -> Result<HttpResponse, ServerError> {
    let order = api.place_order(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

#[get("/orders/{id}")]
pub async fn order_by_id(api: web::Data<OrderApi>, path: web::Path<i64>) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let order = api.order_by_id(id).await?.ok_or(ServerError::OrderFlow(
        xmr_order_engine::OrderFlowError::OrderNotFound(id),
    ))?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

#[post("/orders/{id}/purchased")]
pub async fn order_purchased(api: web::Data<OrderApi>, path: web::Path<i64>) -> Result<HttpResponse, ServerError> {
    let order = api.mark_order_purchased(path.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

#[post("/orders/{id}/arrived")]
pub async fn order_arrived(api: web::Data<OrderApi>, path: web::Path<i64>) -> Result<HttpResponse, ServerError> {
    let order = api.mark_order_arrived(path.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

#[post("/orders/{id}/completed")]
pub async fn order_completed(api: web::Data<OrderApi>, path: web::Path<i64>) -> Result<HttpResponse, ServerError> {
    let order = api.mark_order_completed(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

#[post("/orders/{id}/lost")]
pub async fn order_lost(api: web::Data<OrderApi>, path: web::Path<i64>) -> Result<HttpResponse, ServerError> {
    let order = api.mark_order_lost(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

/// Address-info façade: issue a fresh receiving address.
#[post("/addresses")]
pub async fn create_address(ledger: web::Data<RpcLedger>) -> Result<HttpResponse, ServerError> {
    let address = ledger.issue_address().await?;
    info!("Issued new receiving address {address}");
    Ok(HttpResponse::Ok().json(IssuedAddress { address }))
}

/// Address-info façade: confirmed payment summary for one address. 404 for an address the wallet
/// never issued.
#[get("/addresses/{address}")]
pub async fn address_info(
    ledger: web::Data<RpcLedger>,
    config: web::Data<ServerConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let address = path.into_inner();
    let max_height = effective_max_height(ledger.get_ref(), config.get_ref()).await?;
    let payments = ledger.incoming_payments(&address, max_height).await?;
    let total_received: Piconero = payments.iter().map(|p| p.amount).sum();
    let last_txn_hash = payments.last().map(|p| p.txid.clone());
    Ok(HttpResponse::Ok().json(AddressInfo { total_received, last_txn_hash }))
}
