//! Wire protocol: inbound envelopes and outbound frames.
//!
//! Inbound text and binary frames share one JSON envelope shape. The payload is
//! kept as `RawValue` so only the handler that owns its schema ever parses it.
//! Parsing is panic-free: malformed input is reported as `DispatchError::Decode`.

pub mod envelope;
pub mod frame;

pub use envelope::{decode, Envelope};
pub use frame::Frame;
