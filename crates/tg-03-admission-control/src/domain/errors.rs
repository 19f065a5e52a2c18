//! Proof validation error types.

use shared_types::{Amount, SecretFormatError};
use thiserror::Error;

/// Why a proof secret was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Not a 32-byte secret in the expected wire form.
    #[error("malformed secret: {0}")]
    Malformed(#[from] SecretFormatError),

    /// The secret has already been accepted once.
    #[error("secret already used")]
    Replayed,

    /// The oracle does not recognise the bytes as a proof.
    #[error("secret rejected by proof oracle")]
    Rejected,

    /// The decoded value is below the minimum in force at validation time.
    #[error("proof value {value} below minimum {minimum}")]
    BelowMinimum { value: Amount, minimum: Amount },
}
