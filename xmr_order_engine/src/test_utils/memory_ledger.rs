//! An in-memory stand-in for the wallet ledger, for driving the engine in tests without a
//! running wallet RPC.
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use xog_common::Piconero;

use crate::traits::{Ledger, LedgerError, LedgerPayment};

#[derive(Default)]
struct LedgerState {
    issued: HashSet<String>,
    payments: HashMap<String, Vec<LedgerPayment>>,
    /// Addresses whose payment queries fail with `Unavailable`, to exercise per-order skip paths.
    broken: HashSet<String>,
    /// Addresses to hand out before falling back to generated ones.
    queued: VecDeque<String>,
    counter: u64,
}

/// Shared-state mock ledger. Clones observe the same state.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed payment to `address` at the given height.
    pub fn credit(&self, address: &str, amount: Piconero, txid: &str, height: u64) {
        let mut state = self.inner.lock().unwrap();
        state.issued.insert(address.to_string());
        let payments = state.payments.entry(address.to_string()).or_default();
        payments.push(LedgerPayment { txid: txid.to_string(), amount, height });
        payments.sort_by_key(|p| p.height);
    }

    /// Make payment queries against `address` fail until further notice.
    pub fn break_address(&self, address: &str) {
        self.inner.lock().unwrap().broken.insert(address.to_string());
    }

    /// Force the next `issue_address` call to return `address`, even if it was issued before.
    /// Used to provoke collisions.
    pub fn queue_address(&self, address: &str) {
        self.inner.lock().unwrap().queued.push_back(address.to_string());
    }
}

impl Ledger for MemoryLedger {
    async fn issue_address(&self) -> Result<String, LedgerError> {
        let mut state = self.inner.lock().unwrap();
        let address = state.queued.pop_front().unwrap_or_else(|| {
            state.counter += 1;
            format!("9xogSub{:04}", state.counter)
        });
        state.issued.insert(address.clone());
        Ok(address)
    }

    async fn incoming_payments(&self, address: &str, max_height: u64) -> Result<Vec<LedgerPayment>, LedgerError> {
        let state = self.inner.lock().unwrap();
        if state.broken.contains(address) {
            return Err(LedgerError::Unavailable("injected ledger failure".to_string()));
        }
        if !state.issued.contains(address) {
            return Err(LedgerError::UnknownAddress(address.to_string()));
        }
        let payments = state
            .payments
            .get(address)
            .map(|payments| payments.iter().filter(|p| p.height <= max_height).cloned().collect())
            .unwrap_or_default();
        Ok(payments)
    }

    async fn height(&self) -> Result<u64, LedgerError> {
        let state = self.inner.lock().unwrap();
        let height = state.payments.values().flatten().map(|p| p.height).max().unwrap_or_default();
        Ok(height)
    }
}
