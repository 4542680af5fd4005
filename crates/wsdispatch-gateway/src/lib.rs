//! wsDispatch gateway library entry.
//!
//! Wires the transport, dispatcher, and built-in handlers into a WebSocket
//! server. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod ops;
pub mod router;
pub mod transport;
