//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors produced while parsing a proof secret from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretFormatError {
    /// The `0x` prefix is missing.
    #[error("secret must start with 0x")]
    MissingPrefix,

    /// The secret does not decode to exactly 32 bytes.
    #[error("secret must be 32 bytes, got {len}")]
    WrongLength { len: usize },

    /// The digits are not valid hexadecimal.
    #[error("secret is not valid hex")]
    InvalidHex,
}
