//! Ledger client that never broadcasts.
//!
//! Lets the gateway run end to end without a chain connection. Claims are
//! logged and acknowledged with deterministic hashes.

use crate::ports::outbound::{
    ClaimReceipt, ClaimRequest, LedgerClient, LedgerClientError, SubmittedClaim,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use shared_types::H256;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct DryRunLedgerClient {
    next_sequence: AtomicU64,
    block_number: AtomicU64,
    claims: Mutex<Vec<ClaimRequest>>,
}

impl DryRunLedgerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every claim submitted so far, re-submissions included.
    pub fn claims(&self) -> Vec<ClaimRequest> {
        self.claims.lock().clone()
    }

    fn tx_hash(request: &ClaimRequest) -> H256 {
        let mut hasher = Keccak256::new();
        hasher.update(request.claim_nonce.as_bytes());
        hasher.update(request.sequence.to_be_bytes());
        for secret in &request.secrets {
            hasher.update(secret.as_bytes());
        }
        H256::from_slice(&hasher.finalize())
    }
}

#[async_trait]
impl LedgerClient for DryRunLedgerClient {
    async fn transaction_count(&self) -> Result<u64, LedgerClientError> {
        Ok(self.next_sequence.load(Ordering::SeqCst))
    }

    async fn submit_claim(
        &self,
        request: &ClaimRequest,
    ) -> Result<SubmittedClaim, LedgerClientError> {
        // Same sequence replaces, so only a new sequence advances the count.
        self.next_sequence
            .fetch_max(request.sequence + 1, Ordering::SeqCst);
        self.claims.lock().push(request.clone());

        let tx_hash = Self::tx_hash(request);
        info!(
            tx_hash = ?tx_hash,
            sequence = request.sequence,
            secrets = request.secrets.len(),
            "Dry-run claim (not broadcast)"
        );

        Ok(SubmittedClaim {
            tx_hash,
            sequence: request.sequence,
        })
    }

    async fn await_confirmation(
        &self,
        claim: &SubmittedClaim,
    ) -> Result<ClaimReceipt, LedgerClientError> {
        let block_number = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ClaimReceipt {
            tx_hash: claim.tx_hash,
            block_number,
        })
    }
}
