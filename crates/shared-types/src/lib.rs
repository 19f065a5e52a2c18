//! # Shared Types Crate
//!
//! This crate contains the types every gateway subsystem agrees on: session and
//! connection identifiers, the 32-byte proof [`Secret`], arbitrary-precision
//! [`Amount`]s and the public [`NetworkParams`] a client needs to mint proofs.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-subsystem types are defined here.
//! - **Bytes, not strings**: Secrets are compared by their decoded bytes, so
//!   two hex spellings of the same secret are the same secret.
//! - **Consume once**: [`SeenSecretCache`] is the global replay guard.

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
