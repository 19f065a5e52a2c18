//! `net_*` JSON-RPC methods.

use crate::domain::error::{ApiError, ApiResult};
use crate::state::GatewayState;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use shared_types::{amount_to_padded_hex, Amount, ConnectionId, SessionId};
use std::sync::Arc;
use tg_01_directory_store::{Filters, Orders, Row};
use tracing::{info, instrument};

/// Everything a client needs to mint a proof for this gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicParams {
    /// Decimal chain id
    pub chain_id: String,
    pub contract_address: String,
    pub receiver_address: String,
    /// Claim nonce, 32 bytes
    pub nonce: String,
    /// Current minimum proof value, zero-padded to 64 hex digits
    pub minimum_price: String,
}

/// Net RPC methods handler
#[derive(Debug, Clone)]
pub struct NetRpc {
    state: Arc<GatewayState>,
}

impl NetRpc {
    pub fn new(state: Arc<GatewayState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<GatewayState> {
        &self.state
    }

    /// net_get - Returns the public parameters. Free.
    #[instrument(skip(self))]
    pub async fn get(&self) -> ApiResult<PublicParams> {
        let params = &self.state.params;
        Ok(PublicParams {
            chain_id: params.chain_id.to_string(),
            contract_address: format!("0x{}", hex::encode(params.contract_address.as_bytes())),
            receiver_address: format!("0x{}", hex::encode(params.receiver_address.as_bytes())),
            nonce: format!("0x{}", hex::encode(params.claim_nonce.as_bytes())),
            minimum_price: amount_to_padded_hex(&self.state.admission.current_minimum()),
        })
    }

    /// net_tip - Consumes a proof secret and credits the session with its
    /// value above the current minimum. Returns the credit as a decimal string.
    #[instrument(skip(self, secret_hex), fields(session = %session))]
    pub async fn tip(&self, session: &SessionId, secret_hex: &str) -> ApiResult<String> {
        let proof = self.state.validator.validate_hex(secret_hex)?;

        self.state.ledger.credit(session, &proof.credited);
        info!("Received {} wei", proof.value);

        // Settlement runs detached; its outcome never reaches this caller.
        let _ = self.state.batcher.record(proof.secret, &proof.value);

        Ok(proof.credited.to_string())
    }

    /// net_signal - Announces `row` under `key` for this connection.
    #[instrument(skip(self, row), fields(session = %session, connection = %connection))]
    pub async fn signal(
        &self,
        session: &SessionId,
        connection: ConnectionId,
        key: String,
        row: Row,
    ) -> ApiResult<()> {
        self.charge(session, &self.state.costs.signal)?;

        info!("Got signal for {}", row.to_json());
        self.state.directory.announce(connection, key, row);
        Ok(())
    }

    /// net_search - Runs a directory query.
    #[instrument(skip(self, orders, filters), fields(session = %session))]
    pub async fn search(
        &self,
        session: &SessionId,
        orders: Orders,
        filters: Filters,
    ) -> ApiResult<Vec<Row>> {
        self.charge(session, &self.state.costs.search)?;
        Ok(self.state.directory.search(&orders, &filters))
    }

    fn charge(&self, session: &SessionId, cost: &Amount) -> ApiResult<()> {
        let balance = self.state.ledger.charge(session, cost);
        if balance.is_negative() {
            return Err(ApiError::payment_required(&balance));
        }
        Ok(())
    }
}
