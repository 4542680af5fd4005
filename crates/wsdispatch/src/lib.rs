//! Top-level facade crate for wsDispatch.
//!
//! Re-exports the core protocol types and the gateway library so users can depend
//! on a single crate.

pub mod core {
    pub use wsdispatch_core::*;
}

pub mod gateway {
    pub use wsdispatch_gateway::*;
}
