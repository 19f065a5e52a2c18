//! # Claim Batcher Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Accumulates accepted proofs and realises their value on the ledger
//! contract in batches.
//!
//! ## Settlement Flow
//!
//! ```text
//! record(secret, value)
//!     │
//!     └── count > threshold ──→ take batch ──→ request_settlement()
//!                                                  │
//!                                    spawn ──→ enter().await  (one in flight)
//!                                                  │
//!                          ┌───────────────────────┘
//!                          │
//!                   transaction_count()
//!                          │
//!          ┌──────► submit_claim() ──15s──► await_confirmation() ──15s──► done
//!          │              │                          │
//!          └── timeout ◄──┴──────────────────────────┘
//! ```
//!
//! A timeout is never an outcome: the identical request is re-submitted
//! under the same sequence number until the client either succeeds or
//! reports a real failure.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Batch handoff is atomic with the reset | `domain/batcher.rs` - `record()` under one lock |
//! | INVARIANT-2 | At most one settlement in flight | `domain/batcher.rs` - `settle()` holds a `SettlementAttempt` |
//! | INVARIANT-3 | Timeouts are retried, never returned | `domain/retry.rs` - `retry_on_timeout()` |

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::DryRunLedgerClient;
pub use domain::*;
pub use ports::outbound::{ClaimReceipt, ClaimRequest, LedgerClient, LedgerClientError, SubmittedClaim};
