//! Pending batch of consumed secrets.

use num_traits::Zero;
use shared_types::{Amount, Secret};

/// Secrets waiting for settlement and the sum of their decoded values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBatch {
    secrets: Vec<Secret>,
    total: Amount,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, secret: Secret, value: &Amount) {
        self.secrets.push(secret);
        self.total += value;
    }

    /// Moves everything out, leaving this batch empty with a zero total.
    pub fn take(&mut self) -> PendingBatch {
        std::mem::take(self)
    }

    /// Puts a failed batch back in front of whatever accumulated since.
    pub fn requeue(&mut self, mut failed: PendingBatch) {
        failed.secrets.append(&mut self.secrets);
        failed.total += &self.total;
        *self = failed;
    }

    pub fn secrets(&self) -> &[Secret] {
        &self.secrets
    }

    pub fn total(&self) -> &Amount {
        &self.total
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty() && self.total.is_zero()
    }

    pub fn into_secrets(self) -> Vec<Secret> {
        self.secrets
    }
}
