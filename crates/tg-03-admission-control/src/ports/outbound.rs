//! Outbound (Driven) ports for the admission control subsystem.
//!
//! The proof scheme is an opaque, swappable primitive. The gateway only ever
//! decodes; generation exists for reference and test clients.

use shared_types::{Amount, Secret};

/// Decodes proof secrets into the value they encode.
pub trait ProofOracle: Send + Sync {
    /// Returns the value `secret` encodes, or `None` if the bytes are not a
    /// valid proof. Must be deterministic.
    fn decode(&self, secret: &Secret) -> Option<Amount>;
}

/// Mints fresh proofs. Used by clients, never by the gateway itself.
pub trait ProofGenerator: Send + Sync {
    /// Produces a proof whose decoded value is at least `minimum`.
    fn generate(&self, minimum: &Amount) -> GeneratedProof;
}

/// A freshly minted proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProof {
    pub secret: Secret,
    pub value: Amount,
}

impl GeneratedProof {
    pub fn to_secret_bytes(&self) -> [u8; 32] {
        *self.secret.as_bytes()
    }
}
