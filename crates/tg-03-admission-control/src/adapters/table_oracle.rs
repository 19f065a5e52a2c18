//! In-memory proof oracle backed by a lookup table.

use crate::ports::outbound::{GeneratedProof, ProofGenerator, ProofOracle};
use dashmap::DashMap;
use shared_types::{Amount, Secret};

/// Oracle whose proofs are whatever has been registered in it.
///
/// Useful where deterministic values matter more than the proof scheme.
#[derive(Debug, Default)]
pub struct TableOracle {
    values: DashMap<Secret, Amount>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, secret: Secret, value: Amount) {
        self.values.insert(secret, value);
    }

    /// Registers a fresh random secret worth exactly `value`.
    pub fn mint(&self, value: Amount) -> Secret {
        loop {
            let secret = Secret::from_bytes(rand::random());
            if !self.values.contains_key(&secret) {
                self.values.insert(secret, value);
                return secret;
            }
        }
    }
}

impl ProofOracle for TableOracle {
    fn decode(&self, secret: &Secret) -> Option<Amount> {
        self.values.get(secret).map(|v| v.value().clone())
    }
}

impl ProofGenerator for TableOracle {
    fn generate(&self, minimum: &Amount) -> GeneratedProof {
        let secret = self.mint(minimum.clone());
        GeneratedProof {
            secret,
            value: minimum.clone(),
        }
    }
}
