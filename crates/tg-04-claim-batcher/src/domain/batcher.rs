//! # Claim Batcher
//!
//! Owns the pending batch and drives settlement. Tip handlers call
//! [`ClaimBatcher::record`] and never wait on the ledger.

use super::batch::PendingBatch;
use super::config::{BatcherConfig, FailedBatchPolicy};
use super::errors::SettlementError;
use super::retry::{retry_on_timeout, with_deadline};
use crate::ports::outbound::{ClaimReceipt, ClaimRequest, LedgerClient};
use parking_lot::Mutex;
use shared_types::{Amount, Secret, H256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tg_03_admission_control::{AdmissionController, SettlementRequest};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Statistics for settlement
#[derive(Debug, Default)]
pub struct BatcherStats {
    /// Batches handed to settlement
    pub settlements_started: AtomicU64,
    /// Batches confirmed on the ledger
    pub settlements_succeeded: AtomicU64,
    /// Batches that ended in a client error
    pub settlements_failed: AtomicU64,
    /// Attempts abandoned on timeout and re-submitted
    pub timeouts: AtomicU64,
    /// Secrets put back by the requeue policy
    pub requeued_secrets: AtomicU64,
}

pub struct ClaimBatcher {
    config: BatcherConfig,
    claim_nonce: H256,
    client: Arc<dyn LedgerClient>,
    admission: Arc<AdmissionController>,
    pending: Mutex<PendingBatch>,
    stats: BatcherStats,
}

impl ClaimBatcher {
    pub fn new(
        config: BatcherConfig,
        claim_nonce: H256,
        client: Arc<dyn LedgerClient>,
        admission: Arc<AdmissionController>,
    ) -> Self {
        Self {
            config,
            claim_nonce,
            client,
            admission,
            pending: Mutex::new(PendingBatch::new()),
            stats: BatcherStats::default(),
        }
    }

    /// Adds an accepted proof to the pending batch.
    ///
    /// When the batch grows past the threshold it is handed to a detached
    /// settlement task and the pending batch starts over empty. The section
    /// is requested before the task is spawned, so a crossing that finds
    /// another settlement in flight has raised the price by the time this
    /// returns. The handle is returned for callers that want to observe the
    /// outcome; dropping it does not cancel the settlement.
    pub fn record(self: &Arc<Self>, secret: Secret, value: &Amount) -> Option<JoinHandle<()>> {
        let ready = {
            let mut pending = self.pending.lock();
            pending.push(secret, value);
            (pending.len() > self.config.threshold).then(|| pending.take())
        }?;

        let request = self.admission.request_settlement();
        let batcher = Arc::clone(self);
        Some(tokio::spawn(async move {
            batcher.settle_detached(request, ready).await;
        }))
    }

    async fn settle_detached(&self, request: SettlementRequest, batch: PendingBatch) {
        let count = batch.len();
        let total = batch.total().clone();

        match self.settle_requested(request, batch.clone()).await {
            Ok(receipt) => {
                info!(
                    tx_hash = ?receipt.tx_hash,
                    block = receipt.block_number,
                    secrets = count,
                    "Claimed {} wei",
                    total
                );
            }
            Err(e) => {
                error!(error = %e, secrets = count, total = %total, "Settlement failed");
                if self.config.failed_batch_policy == FailedBatchPolicy::Requeue {
                    self.stats
                        .requeued_secrets
                        .fetch_add(count as u64, Ordering::Relaxed);
                    self.pending.lock().requeue(batch);
                }
            }
        }
    }

    /// Settles `batch` on the ledger.
    ///
    /// Waits for any settlement already in flight. Returns once the claim is
    /// confirmed or the client reports a failure; timeouts are retried with
    /// the identical request and never returned.
    pub async fn settle(&self, batch: PendingBatch) -> Result<ClaimReceipt, SettlementError> {
        let request = self.admission.request_settlement();
        self.settle_requested(request, batch).await
    }

    async fn settle_requested(
        &self,
        request: SettlementRequest,
        batch: PendingBatch,
    ) -> Result<ClaimReceipt, SettlementError> {
        let _attempt = request.enter().await;
        self.stats.settlements_started.fetch_add(1, Ordering::Relaxed);

        let result = self.claim(batch).await;
        let counter = match result {
            Ok(_) => &self.stats.settlements_succeeded,
            Err(_) => &self.stats.settlements_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        result
    }

    async fn claim(&self, batch: PendingBatch) -> Result<ClaimReceipt, SettlementError> {
        let sequence = self.client.transaction_count().await?;
        let total = batch.total().clone();
        let request = ClaimRequest {
            claim_nonce: self.claim_nonce,
            secrets: batch.into_secrets(),
            sequence,
        };
        let deadline = self.config.submission_timeout;
        let (request, total) = (&request, &total);

        retry_on_timeout(
            || async move {
                info!(secrets = request.secrets.len(), sequence, "Claiming {} wei", total);
                let submitted = with_deadline(
                    "submission",
                    deadline,
                    self.client.submit_claim(request),
                )
                .await?;

                info!("Waiting for {:?} on {}", submitted.tx_hash, submitted.sequence);
                with_deadline(
                    "confirmation",
                    deadline,
                    self.client.await_confirmation(&submitted),
                )
                .await
            },
            |_| {
                self.stats.timeouts.fetch_add(1, Ordering::Relaxed);
            },
        )
        .await
    }

    /// Number of secrets waiting for the next settlement.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn pending_total(&self) -> Amount {
        self.pending.lock().total().clone()
    }

    pub fn stats(&self) -> &BatcherStats {
        &self.stats
    }

    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }
}

impl std::fmt::Debug for ClaimBatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimBatcher")
            .field("config", &self.config)
            .field("pending", &self.pending_count())
            .finish()
    }
}
