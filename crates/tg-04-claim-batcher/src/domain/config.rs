//! Batcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settlement starts once more than this many secrets are pending.
pub const DEFAULT_THRESHOLD: usize = 640;

/// Per-phase wait before a claim is re-submitted.
pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(15);

/// What happens to a batch whose settlement fails for a reason other than
/// a timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedBatchPolicy {
    /// Log and forget. The secrets stay consumed and their value is lost.
    #[default]
    Drop,
    /// Put the secrets back at the front of the pending batch.
    Requeue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatcherConfig {
    pub threshold: usize,
    pub submission_timeout: Duration,
    pub failed_batch_policy: FailedBatchPolicy,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            failed_batch_policy: FailedBatchPolicy::default(),
        }
    }
}
