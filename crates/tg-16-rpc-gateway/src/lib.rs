// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! TG-16 RPC Gateway - metered JSON-RPC over HTTP and WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        RPC GATEWAY (tg-16)                           │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                    GET/POST  /?session=<id>                          │
//! │                               │                                      │
//! │              upgrade? ────────┴──────── POST application/json        │
//! │                 │                                │                   │
//! │  ┌──────────────┴─────────────┐   ┌──────────────┴───────────────┐   │
//! │  │   WebSocketHandler         │   │   handle_json_rpc            │   │
//! │  │   get/tip/signal/search    │   │   get/tip/search             │   │
//! │  │   402 → error -32402       │   │   402 → "Payment Required"   │   │
//! │  └──────────────┬─────────────┘   └──────────────┬───────────────┘   │
//! │                 └────────────┬───────────────────┘                   │
//! │                        NetRpc (rpc/net.rs)                           │
//! └──────────────────────────────┼───────────────────────────────────────┘
//!                                │
//!     ┌──────────────┬───────────┼──────────────┬──────────────┐
//!     ▼              ▼           ▼              ▼              ▼
//! tg-01-directory tg-02-ledger tg-03-admission tg-04-claim-batcher
//! ```
//!
//! # Methods
//!
//! | Method       | Cost  | Transports     |
//! |--------------|-------|----------------|
//! | `net_get`    | free  | HTTP, WebSocket |
//! | `net_tip`    | free  | HTTP, WebSocket |
//! | `net_signal` | 2^20  | WebSocket       |
//! | `net_search` | 2^16  | HTTP, WebSocket |
//!
//! Charges are debit-first: the balance is reduced before the sign check,
//! and a rejected call keeps its debit.
//!
//! # Usage
//!
//! ```ignore
//! use tg_16_rpc_gateway::{GatewayConfig, GatewayService};
//!
//! let service = GatewayService::new(config, claim_nonce, oracle, client)?;
//! service.serve(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod rpc;
pub mod service;
pub mod state;
pub mod ws;

// Re-exports for public API
pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use rpc::{NetRpc, PublicParams};
pub use service::{build_router, GatewayService};
pub use state::GatewayState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
