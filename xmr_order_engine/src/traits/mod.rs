//! Interface contracts of the engine's collaborators.
//!
//! * [`OrderStore`] is the order-ledger backend contract: atomic inserts, state-guarded commits
//!   and catalog queries.
//! * [`RateStore`] persists the append-only exchange-rate snapshots.
//! * [`Ledger`] is the boundary to the external system of record for confirmed payments (the
//!   wallet RPC in production, an in-memory double in tests).
//! * [`AddressCipher`] is the injected capability that encrypts mailing addresses at rest. The
//!   engine calls it; it never implements the mechanism itself.
mod cipher;
mod ledger;
mod order_store;
mod rate_store;

pub use cipher::{AddressCipher, CipherError, PassthroughCipher};
pub use ledger::{Ledger, LedgerError, LedgerPayment};
pub use order_store::{OrderStore, OrderStoreError};
pub use rate_store::{RateStore, RateStoreError};
