//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `SessionId`, `ConnectionId`
//! - **Payment**: `Secret`, `Amount`
//! - **Network**: `NetworkParams`, `Address`, `H256`

use crate::errors::SecretFormatError;
use num_bigint::{BigInt, Sign};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

pub use primitive_types::{H160 as Address, H256};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Opaque session identifier supplied by the transport (the `?session=` value).
///
/// A session owns one balance in the session ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of one live transport connection.
///
/// Directory records are owned by the connection that announced them and
/// are released when that connection tears down. Uses UUID v7 so ids sort
/// by creation time in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER B: PAYMENT
// =============================================================================

/// Arbitrary-precision signed amount, in the same unit as decoded proof values.
///
/// Balances may go negative, prices are unbounded upward.
pub type Amount = BigInt;

/// Length of a proof secret in bytes.
pub const SECRET_LEN: usize = 32;

/// A one-time proof token.
///
/// Wire form is `0x` followed by exactly 64 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    pub const fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a secret from a slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SecretFormatError> {
        let array: [u8; SECRET_LEN] = bytes
            .try_into()
            .map_err(|_| SecretFormatError::WrongLength { len: bytes.len() })?;
        Ok(Self(array))
    }

    /// Parses the `0x`-prefixed wire form.
    pub fn from_hex(s: &str) -> Result<Self, SecretFormatError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(SecretFormatError::MissingPrefix)?;

        if digits.len() != SECRET_LEN * 2 {
            return Err(SecretFormatError::WrongLength {
                len: digits.len() / 2,
            });
        }

        let mut bytes = [0u8; SECRET_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| SecretFormatError::InvalidHex)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a prefix: secrets are bearer tokens until they are settled.
        write!(f, "Secret(0x{}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Secret::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Returns `2^bits` as an [`Amount`].
pub fn pow2(bits: u32) -> Amount {
    BigInt::from(1u8) << bits
}

/// Interprets 32 big-endian bytes as a non-negative [`Amount`].
pub fn amount_from_be_bytes(bytes: &[u8]) -> Amount {
    BigInt::from_bytes_be(Sign::Plus, bytes)
}

/// Formats a non-negative amount as `0x` hex, zero-padded to 64 digits.
///
/// Amounts wider than 256 bits keep all their digits.
pub fn amount_to_padded_hex(amount: &Amount) -> String {
    format!("0x{:0>64}", amount.to_str_radix(16))
}

// =============================================================================
// CLUSTER C: NETWORK
// =============================================================================

/// Public parameters a client needs to construct a valid proof.
///
/// The claim nonce identifies this gateway instance's proof domain and is
/// distinct from the ledger transaction sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    pub chain_id: u64,
    pub contract_address: Address,
    pub receiver_address: Address,
    pub claim_nonce: H256,
}

impl NetworkParams {
    /// The four 32-byte words that bind a proof to this gateway:
    /// chain id, contract, receiver and claim nonce, each left-padded.
    pub fn mixin_words(&self) -> [[u8; 32]; 4] {
        let mut chain_id = [0u8; 32];
        chain_id[24..].copy_from_slice(&self.chain_id.to_be_bytes());

        let mut contract = [0u8; 32];
        contract[12..].copy_from_slice(self.contract_address.as_bytes());

        let mut receiver = [0u8; 32];
        receiver[12..].copy_from_slice(self.receiver_address.as_bytes());

        [chain_id, contract, receiver, self.claim_nonce.to_fixed_bytes()]
    }
}
