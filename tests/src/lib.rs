//! # Tollgate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── directory_benchmarks.rs  # Indexed query throughput
//! │
//! └── src/integration/             # Cross-subsystem flows
//!     ├── flows.rs                 # Pay-per-call over the HTTP router
//!     └── settlement.rs            # Threshold crossing and claim submission
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tg-tests
//!
//! # Benchmarks
//! cargo bench -p tg-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
