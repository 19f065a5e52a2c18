//! Domain types for the RPC gateway.
//!
//! Configuration and JSON-RPC error handling. The subsystems behind the
//! gateway own their own domains.

pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::{ConfigError, GatewayConfig, LimitsConfig};
pub use error::{codes, ApiError, ApiResult, GatewayError};
