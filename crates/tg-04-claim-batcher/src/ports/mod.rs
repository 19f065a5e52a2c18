//! Ports for the claim batcher.

pub mod outbound;
