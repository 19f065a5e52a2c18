//! # Pay-Per-Call Flows
//!
//! Drives the HTTP router end to end: session balances, proof top-ups,
//! directory search and the out-of-band payment-required status.
//!
//! ## Flow Tested:
//!
//! 1. `net_search` at balance 0 → 402, debit kept
//! 2. `net_tip` credits `value - minimum`
//! 3. `net_search` succeeds and returns filtered, ordered rows

#[cfg(test)]
mod tests {
    use crate::integration::{TestGateway, TEST_CLAIM_NONCE};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use shared_types::{pow2, ConnectionId};
    use std::sync::Arc;
    use tg_01_directory_store::Row;
    use tg_03_admission_control::{KeccakWorkOracle, ProofGenerator, TableOracle};
    use tg_16_rpc_gateway::GatewayConfig;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn seed_directory(gateway: &TestGateway) {
        let owner = ConnectionId::new();
        let rows = [
            ("n1", "eu", 30),
            ("n2", "us", 10),
            ("n3", "eu", 10),
            ("n4", "eu", 20),
        ];
        for (key, region, load) in rows {
            let row = Row::new()
                .with("name", key)
                .with("region", region)
                .with("load", load);
            gateway.state.directory.announce(owner, key.to_string(), row);
        }
    }

    fn names(response: &Value) -> Vec<&str> {
        response["result"]
            .as_array()
            .expect("rows")
            .iter()
            .filter_map(|row| row["name"].as_str())
            .collect()
    }

    // =============================================================================
    // INTEGRATION TESTS: BALANCE → SEARCH
    // =============================================================================

    #[tokio::test]
    async fn test_search_pays_after_tip() {
        let oracle = Arc::new(TableOracle::new());
        let gateway = TestGateway::new(oracle.clone());
        seed_directory(&gateway);

        let search = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "net_search",
            "params": [{"load": "ascending"}, {"region": "eu"}]
        });

        // Balance 0: the debit happens, the call is refused
        let (status, body) = gateway.post("alice", search.clone()).await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body, "Payment Required");
        assert_eq!(
            gateway.state.ledger.balance(&"alice".into()),
            -pow2(16)
        );

        // Top up: credited = value - minimum = 2^17, covering the debt and one search
        let secret = oracle.mint(pow2(16) * 3);
        let response = gateway
            .call("alice", "net_tip", json!([secret.to_hex()]))
            .await;
        assert_eq!(response["result"], pow2(17).to_string());

        let (status, body) = gateway.post("alice", search).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(names(&response), vec!["n3", "n4", "n1"]);

        assert_eq!(gateway.state.ledger.balance(&"alice".into()), 0.into());
    }

    #[tokio::test]
    async fn test_balances_are_per_session() {
        let oracle = Arc::new(TableOracle::new());
        let gateway = TestGateway::new(oracle.clone());

        let secret = oracle.mint(pow2(18));
        gateway
            .call("alice", "net_tip", json!([secret.to_hex()]))
            .await;

        let response = gateway
            .call("alice", "net_search", json!([{}, {}]))
            .await;
        assert_eq!(response["result"], json!([]));

        let (status, _) = gateway
            .post(
                "bob",
                json!({"id": 2, "method": "net_search", "params": [{}, {}]}),
            )
            .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_under_minimum_proof_rejected_and_reusable() {
        let oracle = Arc::new(TableOracle::new());
        let gateway = TestGateway::new(oracle.clone());

        let cheap = oracle.mint(pow2(16) - 1);
        let response = gateway
            .call("alice", "net_tip", json!([cheap.to_hex()]))
            .await;
        assert_eq!(response["error"]["code"], -32602);
        assert!(!gateway.state.validator.seen().contains(&cheap));
        assert_eq!(gateway.state.batcher.pending_count(), 0);
    }

    // =============================================================================
    // INTEGRATION TESTS: REFERENCE PROOF SCHEME
    // =============================================================================

    #[tokio::test]
    async fn test_keccak_proof_round_trip() {
        let params = GatewayConfig::default().network_params(TEST_CLAIM_NONCE);
        let oracle = KeccakWorkOracle::new(&params);
        let gateway = TestGateway::new(Arc::new(oracle.clone()));

        let params = gateway.call("alice", "net_get", json!([])).await;
        assert_eq!(
            params["result"]["minimumPrice"],
            format!("0x{:0>64}", "10000")
        );

        let proof = oracle.generate(&pow2(17));
        let response = gateway
            .call("alice", "net_tip", json!([proof.secret.to_hex()]))
            .await;
        let credited = proof.value.clone() - pow2(16);
        assert_eq!(response["result"], credited.to_string());

        // Same bytes, different spelling
        let shouted = format!("0x{}", proof.secret.to_hex()[2..].to_uppercase());
        let response = gateway.call("alice", "net_tip", json!([shouted])).await;
        assert_eq!(response["error"]["code"], -32602);

        assert_eq!(gateway.state.batcher.pending_count(), 1);
        assert_eq!(gateway.state.batcher.pending_total(), proof.value);
    }
}
