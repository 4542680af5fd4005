//! Dispatcher module exports.
//!
//! Re-exports the dispatcher, registry, and handler-facing context types so
//! downstream consumers can depend on this module directly.

pub mod context;
pub mod dispatcher;
pub mod registry;

pub use context::{Connection, DispatchContext, Scope};
pub use dispatcher::Dispatcher;
pub use registry::{Handler, HandlerRegistry};
