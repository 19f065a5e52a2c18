//! Session balance accounting.

use dashmap::DashMap;
use num_traits::Zero;
use shared_types::{pow2, Amount, SessionId};
use tracing::trace;

/// `net_signal` costs 2^20.
pub const SIGNAL_COST_BITS: u32 = 20;

/// `net_search` costs 2^16.
pub const SEARCH_COST_BITS: u32 = 16;

/// Fixed operation costs, in the same unit as proof values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Costs {
    pub signal: Amount,
    pub search: Amount,
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            signal: pow2(SIGNAL_COST_BITS),
            search: pow2(SEARCH_COST_BITS),
        }
    }
}

/// Balances keyed by session. Each entry is updated under its own shard lock,
/// so a charge or credit is atomic for that session.
#[derive(Debug, Default)]
pub struct SessionLedger {
    balances: DashMap<SessionId, Amount>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debits `cost` unconditionally and returns the resulting balance.
    pub fn charge(&self, session: &SessionId, cost: &Amount) -> Amount {
        let mut balance = self
            .balances
            .entry(session.clone())
            .or_insert_with(Amount::zero);
        *balance -= cost;
        let updated = balance.clone();
        trace!(session = %session, cost = %cost, balance = %updated, "Charged session");
        updated
    }

    /// Credits `amount` and returns the resulting balance.
    pub fn credit(&self, session: &SessionId, amount: &Amount) -> Amount {
        let mut balance = self
            .balances
            .entry(session.clone())
            .or_insert_with(Amount::zero);
        *balance += amount;
        let updated = balance.clone();
        trace!(session = %session, amount = %amount, balance = %updated, "Credited session");
        updated
    }

    /// Current balance; unknown sessions have zero.
    pub fn balance(&self, session: &SessionId) -> Amount {
        self.balances
            .get(session)
            .map(|b| b.clone())
            .unwrap_or_else(Amount::zero)
    }

    /// Number of sessions that have ever been charged or credited.
    pub fn session_count(&self) -> usize {
        self.balances.len()
    }
}
