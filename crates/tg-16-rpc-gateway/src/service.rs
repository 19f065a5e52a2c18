//! RPC gateway service - main entry point.
//!
//! One listener serves both transports: plain POSTs carry JSON-RPC over
//! HTTP, upgrade requests become WebSocket connections.

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ApiError, ApiResult, GatewayError};
use crate::rpc::{parse_object_param, parse_param, NetRpc};
use crate::state::GatewayState;
use crate::ws::WebSocketHandler;
use axum::{
    extract::{ws::WebSocketUpgrade, DefaultBodyLimit, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{ConnectionId, SessionId, H256};
use std::future::Future;
use std::sync::Arc;
use tg_01_directory_store::{Filters, Orders, Row};
use tg_03_admission_control::ProofOracle;
use tg_04_claim_batcher::LedgerClient;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// RPC gateway service
pub struct GatewayService {
    config: GatewayConfig,
    state: Arc<GatewayState>,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(
        config: GatewayConfig,
        claim_nonce: H256,
        oracle: Arc<dyn ProofOracle>,
        client: Arc<dyn LedgerClient>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let state = Arc::new(GatewayState::new(&config, claim_nonce, oracle, client));

        Ok(Self { config, state })
    }

    pub fn state(&self) -> Arc<GatewayState> {
        Arc::clone(&self.state)
    }

    /// Router serving both transports on `/`
    pub fn router(&self) -> Router {
        build_router(
            NetRpc::new(Arc::clone(&self.state)),
            self.config.limits.max_message_size,
        )
    }

    /// Bind the listener and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;

        info!(addr = %addr, "Starting RPC gateway");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!(
            pending = self.state.batcher.pending_count(),
            "RPC gateway stopped"
        );
        Ok(())
    }
}

/// Build the gateway router around a method handler.
pub fn build_router(rpc: NetRpc, max_message_size: usize) -> Router {
    Router::new()
        .route("/", any(handle_root))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_message_size))
        .layer(TraceLayer::new_for_http())
        .with_state(rpc)
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session: Option<String>,
}

/// Who is calling, and over which transport.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub session: SessionId,
    /// Set for WebSocket callers only
    pub connection: Option<ConnectionId>,
}

impl CallContext {
    pub fn http(session: SessionId) -> Self {
        Self {
            session,
            connection: None,
        }
    }

    pub fn connection(session: SessionId) -> Self {
        Self {
            session,
            connection: Some(ConnectionId::new()),
        }
    }
}

/// Transport dispatch for `/`
async fn handle_root(
    State(rpc): State<NetRpc>,
    Query(query): Query<SessionQuery>,
    method: Method,
    headers: HeaderMap,
    upgrade: Option<WebSocketUpgrade>,
    body: String,
) -> Response {
    let Some(session) = query.session.map(SessionId::new) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    if let Some(upgrade) = upgrade {
        let max_message_size = rpc.state().limits.max_message_size;
        return upgrade
            .max_message_size(max_message_size)
            .on_upgrade(move |socket| {
                WebSocketHandler::new(rpc, session, max_message_size).handle(socket)
            });
    }

    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }

    if !is_json(&headers) {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type").into_response();
    }

    handle_json_rpc(&rpc, &CallContext::http(session), &body).await
}

/// Media-type essence check; parameters such as `charset` are ignored.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Handle a JSON-RPC POST body
async fn handle_json_rpc(rpc: &NetRpc, ctx: &CallContext, body: &str) -> Response {
    let request: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json_rpc_error(None, &ApiError::parse_error(e.to_string()))),
            )
                .into_response();
        }
    };

    match request {
        Value::Array(requests) if requests.is_empty() => (
            StatusCode::BAD_REQUEST,
            Json(json_rpc_error(None, &ApiError::invalid_request("empty batch"))),
        )
            .into_response(),
        Value::Array(requests) => {
            // Batch elements have no status line of their own.
            let mut responses = Vec::with_capacity(requests.len());
            for req in &requests {
                responses.push(process_single_request(rpc, ctx, req).await.into_json());
            }
            (StatusCode::OK, Json(Value::Array(responses))).into_response()
        }
        single => {
            let reply = process_single_request(rpc, ctx, &single).await;
            if reply.is_payment_required() {
                return (StatusCode::PAYMENT_REQUIRED, "Payment Required").into_response();
            }
            (StatusCode::OK, Json(reply.into_json())).into_response()
        }
    }
}

/// Outcome of one JSON-RPC call, before it is rendered for a transport.
#[derive(Debug)]
pub struct RpcReply {
    pub id: Option<Value>,
    pub outcome: ApiResult<Value>,
}

impl RpcReply {
    pub fn is_payment_required(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.is_payment_required())
    }

    pub fn into_json(self) -> Value {
        match self.outcome {
            Ok(result) => json_rpc_result(self.id, result),
            Err(e) => json_rpc_error(self.id, &e),
        }
    }
}

/// Process a single JSON-RPC request
pub async fn process_single_request(rpc: &NetRpc, ctx: &CallContext, request: &Value) -> RpcReply {
    let id = request.get("id").cloned();

    if let Some(ref id_val) = id {
        // Notifications are not supported
        if id_val.is_null() {
            return RpcReply {
                id: None,
                outcome: Err(ApiError::invalid_request(
                    "null id (notifications not supported)",
                )),
            };
        }

        if let Some(s) = id_val.as_str() {
            if s.len() > 256 {
                return RpcReply {
                    id: None,
                    outcome: Err(ApiError::invalid_request(
                        "id string too long (max 256 chars)",
                    )),
                };
            }
        }

        if !id_val.is_string() && !id_val.is_number() {
            return RpcReply {
                id: None,
                outcome: Err(ApiError::invalid_request("id must be string or number")),
            };
        }
    }

    let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
    let params = request.get("params");

    let outcome = route_method(rpc, ctx, method, params).await;
    if let Err(ref e) = outcome {
        debug!(method, code = e.code, "Request failed");
    }

    RpcReply { id, outcome }
}

/// Route a JSON-RPC method to its handler.
///
/// `net_signal` exists only for connection callers; over HTTP it is an
/// unknown method like any other.
async fn route_method(
    rpc: &NetRpc,
    ctx: &CallContext,
    method: &str,
    params: Option<&Value>,
) -> ApiResult<Value> {
    let max_entries = rpc.state().limits.max_entries;

    match method {
        "net_get" => rpc.get().await.and_then(|p| {
            serde_json::to_value(p).map_err(|e| ApiError::internal(e.to_string()))
        }),

        "net_tip" => {
            let secret: String = parse_param(params, 0)?;
            rpc.tip(&ctx.session, &secret).await.map(Value::String)
        }

        "net_signal" => match ctx.connection {
            Some(connection) => {
                let key: String = parse_param(params, 0)?;
                let row: Row = parse_object_param(params, 1, max_entries)?;
                rpc.signal(&ctx.session, connection, key, row)
                    .await
                    .map(|()| Value::Null)
            }
            None => Err(ApiError::method_not_found(method)),
        },

        "net_search" => {
            let orders: Orders = parse_object_param(params, 0, max_entries)?;
            let filters: Filters = parse_object_param(params, 1, max_entries)?;
            rpc.search(&ctx.session, orders, filters)
                .await
                .map(|rows| Value::Array(rows.iter().map(Row::to_json).collect()))
        }

        _ => Err(ApiError::method_not_found(method)),
    }
}

/// Create JSON-RPC success response
pub(crate) fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

/// Create JSON-RPC error response
pub(crate) fn json_rpc_error(id: Option<Value>, error: &ApiError) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "rpc-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
