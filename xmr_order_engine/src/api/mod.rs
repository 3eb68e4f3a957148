//! The engine's public API.
//!
//! * [`order_flow_api::OrderFlowApi`] — placement and fulfilment of orders.
//! * [`reconcile_api::ReconcileApi`] — the periodic pass that matches confirmed ledger payments
//!   to pending orders.
//! * [`exchange_rate_api::ExchangeRateApi`] — append/read access to rate snapshots.
pub mod errors;
pub mod exchange_rate_api;
pub mod order_flow_api;
pub mod reconcile_api;
