//! # Tollgate Gateway Runtime
//!
//! Wires the subsystems behind one RPC gateway and runs it.
//!
//! ## Wiring
//!
//! ```text
//! RuntimeConfig ──→ NetworkParams ──→ KeccakWorkOracle ─┐
//!                                                       ├─→ GatewayService ──→ serve()
//!                   DryRunLedgerClient ─────────────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `TG_CONFIG` file, environment)
//! 2. Derive the public network parameters from the claim nonce
//! 3. Build the proof oracle and ledger client
//! 4. Start the gateway listener
//! 5. Serve until the shutdown signal, then report settlement counters

pub mod config;

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tg_03_admission_control::KeccakWorkOracle;
use tg_04_claim_batcher::DryRunLedgerClient;
use tg_16_rpc_gateway::{GatewayService, GatewayState};
use tracing::info;

pub use config::{load_config, load_from, RuntimeConfig};

/// The gateway runtime.
pub struct GatewayRuntime {
    service: GatewayService,
    state: Arc<GatewayState>,
}

impl GatewayRuntime {
    /// Create a runtime with the reference oracle and a dry-run ledger client.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let params = config.gateway.network_params(config.claim_nonce);
        let oracle = Arc::new(KeccakWorkOracle::new(&params));
        let client = Arc::new(DryRunLedgerClient::new());

        let service = GatewayService::new(config.gateway, config.claim_nonce, oracle, client)
            .context("Failed to create RPC gateway")?;
        let state = service.state();

        Ok(Self { service, state })
    }

    /// Shared state, for inspection.
    pub fn state(&self) -> Arc<GatewayState> {
        Arc::clone(&self.state)
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("===========================================");
        info!("  Tollgate Gateway v{}", tg_16_rpc_gateway::VERSION);
        info!("===========================================");
        info!("Chain ID: {}", self.state.params.chain_id);
        info!("Contract: {:?}", self.state.params.contract_address);
        info!("Receiver: {:?}", self.state.params.receiver_address);

        self.service.serve(shutdown).await?;

        let stats = self.state.batcher.stats();
        info!(
            pending = self.state.batcher.pending_count(),
            started = stats.settlements_started.load(Ordering::Relaxed),
            succeeded = stats.settlements_succeeded.load(Ordering::Relaxed),
            failed = stats.settlements_failed.load(Ordering::Relaxed),
            "Shutdown complete"
        );
        Ok(())
    }
}
