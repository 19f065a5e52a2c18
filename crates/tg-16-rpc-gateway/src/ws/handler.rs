//! WebSocket connection handler.
//!
//! Each text frame carries one JSON-RPC request and gets one response frame.
//! A frame that is not JSON closes the connection. Binary frames are ignored.

use crate::domain::error::ApiError;
use crate::rpc::NetRpc;
use crate::service::{json_rpc_error, process_single_request, CallContext};
use axum::extract::ws::{Message, WebSocket};
use futures::StreamExt;
use shared_types::{ConnectionId, SessionId};
use tracing::{debug, error, info, warn};

/// WebSocket connection handler
pub struct WebSocketHandler {
    rpc: NetRpc,
    ctx: CallContext,
    max_message_size: usize,
}

impl WebSocketHandler {
    pub fn new(rpc: NetRpc, session: SessionId, max_message_size: usize) -> Self {
        Self {
            rpc,
            ctx: CallContext::connection(session),
            max_message_size,
        }
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.ctx.connection
    }

    /// Check message size, returns error response if too large
    fn check_message_size(&self, size: usize) -> Option<String> {
        if size > self.max_message_size {
            warn!(
                connection_id = ?self.ctx.connection,
                size = size,
                max = self.max_message_size,
                "Message exceeds size limit"
            );
            Some(
                json_rpc_error(
                    None,
                    &ApiError::invalid_request(format!(
                        "message too large: {} bytes (max: {})",
                        size, self.max_message_size
                    )),
                )
                .to_string(),
            )
        } else {
            None
        }
    }

    /// Handle a WebSocket connection
    pub async fn handle(self, mut socket: WebSocket) {
        info!(
            connection_id = ?self.ctx.connection,
            session = %self.ctx.session,
            "New WebSocket connection"
        );

        while let Some(result) = socket.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Some(error_response) = self.check_message_size(text.len()) {
                        if let Err(e) = socket.send(Message::Text(error_response)).await {
                            error!(error = %e, "Failed to send error response");
                            break;
                        }
                        continue;
                    }

                    let Some(response) = self.handle_message(&text).await else {
                        debug!(connection_id = ?self.ctx.connection, "Malformed frame, closing");
                        let _ = socket.send(Message::Close(None)).await;
                        break;
                    };

                    if let Err(e) = socket.send(Message::Text(response)).await {
                        error!(error = %e, "Failed to send WebSocket response");
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {}
                Ok(Message::Ping(data)) => {
                    if let Err(e) = socket.send(Message::Pong(data)).await {
                        error!(error = %e, "Failed to send pong");
                        break;
                    }
                }
                Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    debug!(connection_id = ?self.ctx.connection, "WebSocket close received");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "WebSocket error");
                    break;
                }
            }
        }

        let released = self.close();

        info!(
            connection_id = ?self.ctx.connection,
            released,
            "WebSocket connection closed"
        );
    }

    /// Handle a single JSON-RPC message. `None` means the frame was not JSON.
    async fn handle_message(&self, text: &str) -> Option<String> {
        let request: serde_json::Value = serde_json::from_str(text).ok()?;
        let reply = process_single_request(&self.rpc, &self.ctx, &request).await;
        Some(reply.into_json().to_string())
    }

    /// Drop every row this connection announced.
    fn close(&self) -> usize {
        match self.ctx.connection {
            Some(ref connection) => self.rpc.state().directory.release(connection),
            None => 0,
        }
    }
}
