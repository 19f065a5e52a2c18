//! # Outbound Ports
//!
//! The ledger-contract client. Transaction signing, nonce sequencing and
//! receipt polling all live behind this trait.

use async_trait::async_trait;
use shared_types::{Secret, H256};
use thiserror::Error;

/// A claim transaction for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    /// This gateway's proof domain. Not the transaction sequence number.
    pub claim_nonce: H256,
    pub secrets: Vec<Secret>,
    /// Account sequence number the transaction is sent under. Re-submitting
    /// with the same sequence replaces rather than duplicates.
    pub sequence: u64,
}

/// Acknowledgement that a claim was accepted for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedClaim {
    pub tx_hash: H256,
    pub sequence: u64,
}

/// Confirmation of an included claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub tx_hash: H256,
    pub block_number: u64,
}

/// Errors reported by a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("claim rejected: {0}")]
    Rejected(String),

    #[error("transaction reverted: {tx_hash:?}")]
    Reverted { tx_hash: H256 },
}

/// Ledger contract client - outbound port.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Next sequence number for the gateway's account.
    async fn transaction_count(&self) -> Result<u64, LedgerClientError>;

    /// Sends the claim. Resolves once the transaction is accepted for
    /// broadcast, not once it is included.
    async fn submit_claim(&self, request: &ClaimRequest)
        -> Result<SubmittedClaim, LedgerClientError>;

    /// Waits until a submitted claim is included.
    async fn await_confirmation(
        &self,
        claim: &SubmittedClaim,
    ) -> Result<ClaimReceipt, LedgerClientError>;
}
