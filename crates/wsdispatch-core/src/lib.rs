//! wsDispatch core: transport-agnostic envelope decoding, outbound frames, and errors.
//!
//! This crate defines the wire-level contract shared by the gateway and by anything
//! else that wants to route `{"type", "payload"}` messages. It carries no runtime or
//! transport dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every malformed frame surfaces as a `DispatchError` so a hostile client can never
//! take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

pub use error::{BoxError, ClientCode, DispatchError, Result};
