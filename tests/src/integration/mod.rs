//! Cross-subsystem flows, driven through the same entry points clients use.

pub mod flows;
pub mod settlement;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use shared_types::H256;
use std::sync::Arc;
use tg_03_admission_control::ProofOracle;
use tg_04_claim_batcher::DryRunLedgerClient;
use tg_16_rpc_gateway::{GatewayConfig, GatewayService, GatewayState};
use tower::ServiceExt;

/// Claim nonce every test gateway is started with.
pub const TEST_CLAIM_NONCE: H256 = H256::repeat_byte(0x5a);

/// A gateway wired for tests, with handles on its collaborators.
pub struct TestGateway {
    pub router: Router,
    pub state: Arc<GatewayState>,
    pub client: Arc<DryRunLedgerClient>,
}

impl TestGateway {
    pub fn new(oracle: Arc<dyn ProofOracle>) -> Self {
        Self::with_config(GatewayConfig::default(), oracle)
    }

    pub fn with_config(config: GatewayConfig, oracle: Arc<dyn ProofOracle>) -> Self {
        let client = Arc::new(DryRunLedgerClient::new());
        let service = GatewayService::new(
            config,
            TEST_CLAIM_NONCE,
            oracle,
            Arc::clone(&client) as _,
        )
        .expect("default config is valid");

        Self {
            router: service.router(),
            state: service.state(),
            client,
        }
    }

    /// POST one JSON-RPC body for `session`.
    pub async fn post(&self, session: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/?session={}", session))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body fits");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// POST and decode a 200 JSON-RPC response.
    pub async fn call(&self, session: &str, method: &str, params: Value) -> Value {
        let (status, body) = self
            .post(
                session,
                serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{} returned {}", method, body);
        serde_json::from_str(&body).expect("JSON-RPC response")
    }
}
