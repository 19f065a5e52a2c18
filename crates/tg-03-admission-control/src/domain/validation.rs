//! Proof validation for the tip path.

use super::controller::AdmissionController;
use super::errors::ProofError;
use crate::ports::outbound::ProofOracle;
use shared_types::{Amount, Secret, SeenSecretCache};
use std::sync::Arc;
use tracing::debug;

/// An accepted proof and what it is worth to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProof {
    pub secret: Secret,
    /// Full decoded value; this is what settlement realises.
    pub value: Amount,
    /// Minimum in force when this proof was validated.
    pub minimum: Amount,
    /// `value - minimum`, credited to the session.
    pub credited: Amount,
}

/// Validates proof secrets against the oracle, the replay guard and the
/// current minimum price.
pub struct ProofValidator {
    oracle: Arc<dyn ProofOracle>,
    seen: Arc<SeenSecretCache>,
    admission: Arc<AdmissionController>,
}

impl ProofValidator {
    pub fn new(
        oracle: Arc<dyn ProofOracle>,
        seen: Arc<SeenSecretCache>,
        admission: Arc<AdmissionController>,
    ) -> Self {
        Self {
            oracle,
            seen,
            admission,
        }
    }

    /// Parses the `0x` wire form and validates it.
    pub fn validate_hex(&self, secret_hex: &str) -> Result<ValidatedProof, ProofError> {
        let secret = Secret::from_hex(secret_hex)?;
        self.validate(secret)
    }

    /// Validates raw bytes, which must be exactly 32 long.
    pub fn validate_bytes(&self, bytes: &[u8]) -> Result<ValidatedProof, ProofError> {
        let secret = Secret::from_slice(bytes)?;
        self.validate(secret)
    }

    /// Consumes `secret` if it decodes to at least the current minimum.
    ///
    /// The secret is reserved before decoding so concurrent validations of
    /// the same bytes cannot both succeed. A rejected secret is released
    /// again and may be retried once the price falls.
    pub fn validate(&self, secret: Secret) -> Result<ValidatedProof, ProofError> {
        if !self.seen.reserve(secret) {
            return Err(ProofError::Replayed);
        }

        let Some(value) = self.oracle.decode(&secret) else {
            self.seen.release(&secret);
            return Err(ProofError::Rejected);
        };

        let minimum = self.admission.current_minimum();
        if value < minimum {
            self.seen.release(&secret);
            return Err(ProofError::BelowMinimum { value, minimum });
        }

        let credited = &value - &minimum;
        debug!(secret = ?secret, value = %value, minimum = %minimum, "Accepted proof");

        Ok(ValidatedProof {
            secret,
            value,
            minimum,
            credited,
        })
    }

    pub fn admission(&self) -> &Arc<AdmissionController> {
        &self.admission
    }

    pub fn seen(&self) -> &Arc<SeenSecretCache> {
        &self.seen
    }
}

impl std::fmt::Debug for ProofValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofValidator")
            .field("seen", &self.seen.len())
            .field("minimum", &self.admission.current_minimum())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableOracle;
    use shared_types::{pow2, SecretFormatError};

    fn setup() -> (ProofValidator, Arc<TableOracle>) {
        let oracle = Arc::new(TableOracle::new());
        let validator = ProofValidator::new(
            oracle.clone(),
            SeenSecretCache::new_shared(),
            Arc::new(AdmissionController::default()),
        );
        (validator, oracle)
    }

    #[test]
    fn test_credits_value_minus_minimum() {
        let (validator, oracle) = setup();
        let secret = oracle.mint(pow2(17));

        let proof = validator.validate(secret).unwrap();
        assert_eq!(proof.value, pow2(17));
        assert_eq!(proof.minimum, pow2(16));
        assert_eq!(proof.credited, pow2(16));
    }

    #[test]
    fn test_exact_minimum_credits_zero() {
        let (validator, oracle) = setup();
        let secret = oracle.mint(pow2(16));
        assert_eq!(validator.validate(secret).unwrap().credited, Amount::from(0));
    }

    #[test]
    fn test_replay_rejected() {
        let (validator, oracle) = setup();
        let secret = oracle.mint(pow2(20));

        validator.validate(secret).unwrap();
        assert_eq!(validator.validate(secret), Err(ProofError::Replayed));
        assert_eq!(
            validator.validate_hex(&secret.to_hex().to_uppercase().replacen("0X", "0x", 1)),
            Err(ProofError::Replayed)
        );
    }

    #[test]
    fn test_below_minimum_is_released() {
        let (validator, oracle) = setup();
        let secret = oracle.mint(pow2(16) - 1);

        let err = validator.validate(secret).unwrap_err();
        assert!(matches!(err, ProofError::BelowMinimum { .. }));
        assert!(!validator.seen().contains(&secret));
    }

    #[test]
    fn test_unknown_secret_rejected() {
        let (validator, _) = setup();
        let secret = Secret::from_bytes([9; 32]);
        assert_eq!(validator.validate(secret), Err(ProofError::Rejected));
        assert!(validator.seen().is_empty());
    }

    #[test]
    fn test_malformed_inputs() {
        let (validator, _) = setup();
        assert_eq!(
            validator.validate_hex("1234"),
            Err(ProofError::Malformed(SecretFormatError::MissingPrefix))
        );
        assert_eq!(
            validator.validate_bytes(&[0u8; 31]),
            Err(ProofError::Malformed(SecretFormatError::WrongLength { len: 31 }))
        );
        assert!(matches!(
            validator.validate_hex(&format!("0x{}", "zz".repeat(32))),
            Err(ProofError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_raised_minimum_applies_during_contention() {
        let (validator, oracle) = setup();
        let admission = Arc::clone(validator.admission());
        let first = admission.begin_settlement().await;

        let waiter = {
            let admission = Arc::clone(&admission);
            tokio::spawn(async move {
                let _attempt = admission.begin_settlement().await;
            })
        };
        while admission.current_minimum() == pow2(16) {
            tokio::task::yield_now().await;
        }

        let secret = oracle.mint(pow2(16));
        assert!(matches!(
            validator.validate(secret),
            Err(ProofError::BelowMinimum { .. })
        ));

        drop(first);
        waiter.await.unwrap();
        assert_eq!(validator.validate(secret).unwrap().credited, Amount::from(0));
    }
}
