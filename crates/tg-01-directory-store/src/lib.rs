//! # Directory Store Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Holds the records clients announce with `net_signal` and answers
//! `net_search` with equality filters and multi-key ordering, choosing the
//! smallest index-derived candidate set as the scan base.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Equality index complete for every stored column | `domain/store.rs` - `append()` / `remove()` |
//! | INVARIANT-2 | Both order lists sorted and duplicate-free by row identity | `domain/store.rs` - `OrderIndex` keyed by `(value, RowId)` |
//! | INVARIANT-3 | One live record per owner and key | `service.rs` - `announce()` removes before insert |
//! | INVARIANT-4 | Unknown filter/order column yields an empty result | `domain/store.rs` - `smallest()` |
//!
//! ## Module Structure
//!
//! ```text
//! domain/value.rs  - ColumnValue, Row
//! domain/query.rs  - Direction, Orders, Filters
//! domain/store.rs  - DirectoryStore with equality and order indices
//! service.rs       - SessionDirectory (ownership + locking)
//! ```

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::SessionDirectory;
