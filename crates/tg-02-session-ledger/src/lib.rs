//! # Session Ledger Subsystem
//!
//! **Subsystem ID:** 2
//!
//! Per-session integer balances. Validated proofs credit a session; directory
//! writes and searches debit it. Charging is debit-first: the cost is always
//! taken and the resulting balance, possibly negative, is handed back so the
//! caller can decide whether to reject the operation. There is no refund path.

pub mod ledger;

pub use ledger::{Costs, SessionLedger, SEARCH_COST_BITS, SIGNAL_COST_BITS};
