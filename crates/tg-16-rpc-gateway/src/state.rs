//! Shared gateway state.
//!
//! Built once at startup and handed to every request handler behind an
//! `Arc`. Each structure guards itself; no lock spans two of them.

use crate::domain::config::{GatewayConfig, LimitsConfig};
use shared_types::{NetworkParams, SeenSecretCache, H256};
use std::sync::Arc;
use tg_01_directory_store::SessionDirectory;
use tg_02_session_ledger::{Costs, SessionLedger};
use tg_03_admission_control::{AdmissionController, ProofOracle, ProofValidator};
use tg_04_claim_batcher::{ClaimBatcher, LedgerClient};

#[derive(Debug)]
pub struct GatewayState {
    pub params: NetworkParams,
    pub ledger: SessionLedger,
    pub directory: SessionDirectory,
    pub admission: Arc<AdmissionController>,
    pub validator: ProofValidator,
    pub batcher: Arc<ClaimBatcher>,
    pub costs: Costs,
    pub limits: LimitsConfig,
}

impl GatewayState {
    /// Wires the subsystems together for one gateway instance.
    ///
    /// `claim_nonce` identifies this instance's proof domain; `oracle` must
    /// decode proofs minted against the resulting [`NetworkParams`].
    pub fn new(
        config: &GatewayConfig,
        claim_nonce: H256,
        oracle: Arc<dyn ProofOracle>,
        client: Arc<dyn LedgerClient>,
    ) -> Self {
        let params = config.network_params(claim_nonce);
        let admission = Arc::new(AdmissionController::new(config.admission_config()));
        let validator = ProofValidator::new(
            oracle,
            SeenSecretCache::new_shared(),
            Arc::clone(&admission),
        );
        let batcher = Arc::new(ClaimBatcher::new(
            config.batcher_config(),
            claim_nonce,
            client,
            Arc::clone(&admission),
        ));

        Self {
            params,
            ledger: SessionLedger::new(),
            directory: SessionDirectory::new(),
            admission,
            validator,
            batcher,
            costs: config.costs(),
            limits: config.limits.clone(),
        }
    }
}
