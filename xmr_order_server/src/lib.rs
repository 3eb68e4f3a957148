//! HTTP server for the XMR order gateway.
//!
//! Exposes the storefront (catalog + order placement), the fulfilment path, and the address-info
//! façade over the wallet; and hosts the two background workers (payment reconciliation and
//! exchange-rate refresh).
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod workers;
