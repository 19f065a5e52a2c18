//! WebSocket module.
//!
//! One handler per connection. The connection is the only transport that
//! may call `net_signal`; its rows leave the directory when it closes.

pub mod handler;

pub use handler::WebSocketHandler;
