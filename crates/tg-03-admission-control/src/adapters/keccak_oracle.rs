//! Reference work-based proof oracle.
//!
//! A secret is worth more the smaller its keccak digest is when hashed
//! together with this gateway's public parameters:
//!
//! ```text
//! digest = keccak256(chain_id ‖ contract ‖ receiver ‖ claim_nonce ‖ secret)
//! value  = (2^256 - 1) / digest
//! ```
//!
//! Binding the parameters in means a proof minted for one gateway is worth
//! nothing at another.

use crate::ports::outbound::{GeneratedProof, ProofGenerator, ProofOracle};
use num_traits::Zero;
use shared_types::{amount_from_be_bytes, pow2, Amount, NetworkParams, Secret};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone)]
pub struct KeccakWorkOracle {
    mixin: [[u8; 32]; 4],
    numerator: Amount,
}

impl KeccakWorkOracle {
    pub fn new(params: &NetworkParams) -> Self {
        Self {
            mixin: params.mixin_words(),
            numerator: pow2(256) - 1,
        }
    }

    /// Value of `secret`. Every 32-byte string is a valid proof here; the
    /// minimum price does the filtering.
    pub fn value_of(&self, secret: &Secret) -> Amount {
        let mut hasher = Keccak256::new();
        for word in &self.mixin {
            hasher.update(word);
        }
        hasher.update(secret.as_bytes());
        let digest = amount_from_be_bytes(&hasher.finalize());

        if digest.is_zero() {
            return pow2(256);
        }
        &self.numerator / digest
    }
}

impl ProofOracle for KeccakWorkOracle {
    fn decode(&self, secret: &Secret) -> Option<Amount> {
        Some(self.value_of(secret))
    }
}

impl ProofGenerator for KeccakWorkOracle {
    fn generate(&self, minimum: &Amount) -> GeneratedProof {
        loop {
            let secret = Secret::from_bytes(rand::random());
            let value = self.value_of(&secret);
            if &value >= minimum {
                return GeneratedProof { secret, value };
            }
        }
    }
}
