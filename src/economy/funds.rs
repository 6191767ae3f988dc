//! Funds ledger - per-faction integer balances
//!
//! Balances are unbounded in both directions; a negative balance is deficit
//! spending. Every balance equals the sum of all deltas ever applied to it.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// Faction balance store
pub trait FundsLedger {
    /// Balance of a faction; zero for a faction never seen
    fn balance(&self, faction: FactionId) -> i64;

    /// Add a signed delta to a faction's balance
    fn add_balance(&mut self, faction: FactionId, delta: i64);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryFunds {
    balances: AHashMap<FactionId, i64>,
}

impl InMemoryFunds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances in faction order
    pub fn snapshot(&self) -> BTreeMap<FactionId, i64> {
        self.balances.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

impl FundsLedger for InMemoryFunds {
    fn balance(&self, faction: FactionId) -> i64 {
        self.balances.get(&faction).copied().unwrap_or(0)
    }

    fn add_balance(&mut self, faction: FactionId, delta: i64) {
        let balance = self.balances.entry(faction).or_insert(0);
        *balance = balance.saturating_add(delta);
    }
}
