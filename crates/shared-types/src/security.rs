//! # Replay Protection
//!
//! A secret that has been accepted once can never be accepted again. The
//! cache is exact and grows for the process lifetime; there is no eviction.

use crate::entities::Secret;
use dashmap::DashSet;
use std::sync::Arc;

/// Global set of consumed proof secrets.
///
/// ## Usage
///
/// ```
/// use shared_types::{Secret, SeenSecretCache};
///
/// let cache = SeenSecretCache::new();
/// let secret = Secret::from_bytes([1; 32]);
///
/// // First attempt - secret is fresh
/// assert!(cache.reserve(secret));
///
/// // Second attempt - replay detected!
/// assert!(!cache.reserve(secret));
/// ```
#[derive(Debug, Default)]
pub struct SeenSecretCache {
    seen: DashSet<Secret>,
}

impl SeenSecretCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache wrapped in Arc for shared ownership.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Atomically checks whether a secret is fresh and, if so, marks it seen.
    ///
    /// Returns `true` if the caller now holds the secret, `false` on replay.
    pub fn reserve(&self, secret: Secret) -> bool {
        self.seen.insert(secret)
    }

    /// Gives back a reservation for a secret that was not accepted.
    pub fn release(&self, secret: &Secret) {
        self.seen.remove(secret);
    }

    pub fn contains(&self, secret: &Secret) -> bool {
        self.seen.contains(secret)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
