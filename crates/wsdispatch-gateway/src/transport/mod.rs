//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler, the per-connection loop, and the outbound
//! connection handlers write through.

pub mod codec;
pub mod connection;
pub mod ws;
