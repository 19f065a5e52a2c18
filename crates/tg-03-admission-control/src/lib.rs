//! # Admission Control Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Owns the published minimum proof price and the settlement section, and
//! validates incoming proof secrets against both the price and the global
//! replay guard.
//!
//! ## Contention Pricing
//!
//! ```text
//! request_settlement()                       (synchronous)
//!     │
//!     ├── section free ──────────────→ held, price unchanged
//!     │
//!     └── section busy ──→ price × 2
//!                              │
//!                           enter().await ──→ held, price ÷ 2
//! ```
//!
//! Every doubling is undone by exactly one halving, so the price never drops
//! below the baseline and settles back to it once the backlog clears.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | A secret is accepted at most once | `domain/validation.rs` - `SeenSecretCache::reserve()` before decode |
//! | INVARIANT-2 | One price read per validation | `domain/validation.rs` - single `current_minimum()` call |
//! | INVARIANT-3 | At most one settlement in flight | `domain/controller.rs` - `SettlementAttempt` holds the section lock |
//!
//! ## Module Structure
//!
//! ```text
//! domain/controller.rs  - AdmissionController, SettlementRequest, SettlementAttempt
//! domain/validation.rs  - ProofValidator, ValidatedProof
//! domain/errors.rs      - ProofError
//! ports/outbound.rs     - ProofOracle, ProofGenerator
//! adapters/             - KeccakWorkOracle, TableOracle
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{KeccakWorkOracle, TableOracle};
pub use domain::*;
pub use ports::outbound::{GeneratedProof, ProofGenerator, ProofOracle};
