//! RPC method handlers for JSON-RPC API.

pub mod net;
pub mod params;

pub use net::{NetRpc, PublicParams};
pub use params::{parse_object_param, parse_param};
