//! # Settlement Flows
//!
//! Tests that accepted proofs reach the ledger client in batches, and that
//! contention on the settlement section shows up in the advertised price.
//!
//! ## Flow Tested:
//!
//! 1. `net_tip` × (threshold + 1) → exactly one claim with every secret
//! 2. Second batch while the first is unconfirmed → minimum doubles
//! 3. First batch confirmed → minimum back at baseline

#[cfg(test)]
mod tests {
    use crate::integration::{TestGateway, TEST_CLAIM_NONCE};
    use async_trait::async_trait;
    use serde_json::json;
    use shared_types::{pow2, Secret, H256};
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;
    use tg_03_admission_control::TableOracle;
    use tg_04_claim_batcher::{
        ClaimReceipt, ClaimRequest, LedgerClient, LedgerClientError, SubmittedClaim,
    };
    use tg_16_rpc_gateway::{build_router, GatewayConfig, GatewayState, NetRpc};
    use tokio::sync::Semaphore;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Holds every submission until a permit is released.
    struct GatedClient {
        gate: Semaphore,
        submitted: parking_lot::Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl LedgerClient for GatedClient {
        async fn transaction_count(&self) -> Result<u64, LedgerClientError> {
            Ok(0)
        }

        async fn submit_claim(
            &self,
            request: &ClaimRequest,
        ) -> Result<SubmittedClaim, LedgerClientError> {
            self.gate
                .acquire()
                .await
                .map_err(|e| LedgerClientError::Transport(e.to_string()))?
                .forget();
            self.submitted.lock().push(request.secrets.len());
            Ok(SubmittedClaim {
                tx_hash: H256::repeat_byte(0xee),
                sequence: request.sequence,
            })
        }

        async fn await_confirmation(
            &self,
            claim: &SubmittedClaim,
        ) -> Result<ClaimReceipt, LedgerClientError> {
            Ok(ClaimReceipt {
                tx_hash: claim.tx_hash,
                block_number: 1,
            })
        }
    }

    async fn tip_many(gateway: &TestGateway, oracle: &TableOracle, count: usize) -> Vec<Secret> {
        let mut secrets = Vec::with_capacity(count);
        for _ in 0..count {
            let secret = oracle.mint(pow2(16));
            let response = gateway
                .call("tipper", "net_tip", json!([secret.to_hex()]))
                .await;
            assert_eq!(response["result"], "0");
            secrets.push(secret);
        }
        secrets
    }

    async fn eventually(mut done: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition reached in time");
    }

    // =============================================================================
    // INTEGRATION TESTS: THRESHOLD CROSSING
    // =============================================================================

    #[tokio::test]
    async fn test_settles_once_after_threshold() {
        let oracle = Arc::new(TableOracle::new());
        let gateway = TestGateway::new(oracle.clone());

        let mut secrets = tip_many(&gateway, &oracle, 640).await;
        assert_eq!(gateway.state.batcher.pending_count(), 640);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(gateway.client.claims().is_empty());

        secrets.extend(tip_many(&gateway, &oracle, 1).await);
        assert_eq!(gateway.state.batcher.pending_count(), 0);

        let stats = gateway.state.batcher.stats();
        eventually(|| stats.settlements_succeeded.load(Ordering::Relaxed) == 1).await;

        let claims = gateway.client.claims();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].claim_nonce, TEST_CLAIM_NONCE);
        assert_eq!(claims[0].secrets, secrets);
        assert_eq!(stats.settlements_started.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_one_settlement_per_crossing() {
        let mut config = GatewayConfig::default();
        config.settlement.threshold = 3;
        let oracle = Arc::new(TableOracle::new());
        let gateway = TestGateway::with_config(config, oracle.clone());

        tip_many(&gateway, &oracle, 8).await;

        let stats = gateway.state.batcher.stats();
        eventually(|| stats.settlements_succeeded.load(Ordering::Relaxed) == 2).await;

        // Below the next crossing
        tip_many(&gateway, &oracle, 1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(stats.settlements_started.load(Ordering::Relaxed), 2);

        let sizes: Vec<usize> = gateway
            .client
            .claims()
            .iter()
            .map(|c| c.secrets.len())
            .collect();
        assert_eq!(sizes, vec![4, 4]);
        assert_eq!(gateway.state.batcher.pending_count(), 1);

        let claimed: HashSet<_> = gateway
            .client
            .claims()
            .into_iter()
            .flat_map(|c| c.secrets)
            .collect();
        assert_eq!(claimed.len(), 8);
    }

    // =============================================================================
    // INTEGRATION TESTS: CONTENTION PRICING
    // =============================================================================

    #[tokio::test]
    async fn test_contention_raises_advertised_minimum() {
        let mut config = GatewayConfig::default();
        config.settlement.threshold = 1;
        let oracle = Arc::new(TableOracle::new());
        let client = Arc::new(GatedClient {
            gate: Semaphore::new(0),
            submitted: parking_lot::Mutex::new(Vec::new()),
        });
        let state = Arc::new(GatewayState::new(
            &config,
            TEST_CLAIM_NONCE,
            oracle.clone(),
            client.clone(),
        ));
        let gateway = TestGateway {
            router: build_router(NetRpc::new(Arc::clone(&state)), 1 << 20),
            state: Arc::clone(&state),
            client: Arc::new(tg_04_claim_batcher::DryRunLedgerClient::new()),
        };

        // First batch enters the section and blocks in submission
        tip_many(&gateway, &oracle, 2).await;
        eventually(|| state.admission.is_settling()).await;

        assert_eq!(state.admission.current_minimum(), pow2(16));

        // Second batch has to wait behind it
        tip_many(&gateway, &oracle, 2).await;
        eventually(|| state.admission.current_minimum() == pow2(17)).await;

        let params = gateway.call("viewer", "net_get", json!([])).await;
        assert_eq!(
            params["result"]["minimumPrice"],
            format!("0x{:0>64}", "20000")
        );

        // Under-priced proofs are now refused
        let cheap = oracle.mint(pow2(16));
        let response = gateway
            .call("tipper", "net_tip", json!([cheap.to_hex()]))
            .await;
        assert_eq!(response["error"]["code"], -32602);

        // Release both submissions; the price returns to baseline
        client.gate.add_permits(2);
        let stats = state.batcher.stats();
        eventually(|| stats.settlements_succeeded.load(Ordering::Relaxed) == 2).await;
        assert_eq!(state.admission.current_minimum(), pow2(16));
        assert_eq!(*client.submitted.lock(), vec![2, 2]);
    }
}
