//! XMR Order Engine
//!
//! Core logic for a storefront that sells physical goods for Monero. Buyers pay to a dedicated
//! per-order subaddress, and a periodic reconciliation pass matches confirmed wallet transfers
//! against pending orders to drive the order lifecycle.
//!
//! The library is divided into three main sections:
//! 1. The order ledger data types and the pure state machine ([`mod@db_types`]). Every lifecycle
//!    transition is a function from an order value to a new order value that either passes the
//!    commit-time invariant check or fails with a typed error.
//! 2. The storage and service traits ([`mod@traits`]) that backends and external collaborators
//!    (wallet, price oracle cipher) implement. SQLite is the bundled backend.
//! 3. The public API ([`mod@api`]): order placement, fulfilment, exchange-rate snapshots and the
//!    payment reconciliation pass.
pub mod api;
pub mod db_types;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    errors::OrderFlowError,
    exchange_rate_api::ExchangeRateApi,
    order_flow_api::OrderFlowApi,
    reconcile_api::{ReconcileApi, ReconcileSummary},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
