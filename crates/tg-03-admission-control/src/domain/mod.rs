//! Domain layer for admission control.

pub mod controller;
pub mod errors;
pub mod validation;

pub use controller::{
    AdmissionConfig, AdmissionController, AdmissionStats, SettlementAttempt, SettlementRequest,
    BASELINE_MINIMUM_BITS,
};
pub use errors::ProofError;
pub use validation::{ProofValidator, ValidatedProof};
