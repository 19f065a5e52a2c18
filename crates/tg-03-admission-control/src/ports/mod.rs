//! Ports for the admission control subsystem.

pub mod outbound;
