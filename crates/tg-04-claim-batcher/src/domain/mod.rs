//! Domain layer for claim batching.

pub mod batch;
pub mod batcher;
pub mod config;
pub mod errors;
pub mod retry;

pub use batch::PendingBatch;
pub use batcher::{BatcherStats, ClaimBatcher};
pub use config::{BatcherConfig, FailedBatchPolicy, DEFAULT_SUBMISSION_TIMEOUT, DEFAULT_THRESHOLD};
pub use errors::SettlementError;
pub use retry::{retry_on_timeout, with_deadline};
