//! Settlement error types.

use crate::ports::outbound::LedgerClientError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// A phase did not finish in time. Only ever seen inside the retry loop.
    #[error("{phase} timed out after {after:?}")]
    Timeout { phase: &'static str, after: Duration },

    /// The ledger client failed for a reason other than time.
    #[error("ledger client failed: {0}")]
    Client(#[from] LedgerClientError),
}

impl SettlementError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SettlementError::Timeout { .. })
    }
}
