use std::sync::Arc;

use tracing::Instrument;

use wsdispatch_core::error::{DispatchError, Result};
use wsdispatch_core::protocol::envelope;

use super::context::{Connection, DispatchContext, Scope};
use super::registry::{Handler, HandlerRegistry};

/// Decode -> lookup -> invoke, one frame at a time.
///
/// Never writes to the connection and never logs; every failure goes back to
/// the caller as-is.
#[derive(Default)]
pub struct Dispatcher {
    registry: HandlerRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
        }
    }

    pub fn register(&self, event: impl Into<String>, handler: Arc<dyn Handler>) {
        self.registry.register(event, handler);
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, scope: Scope, conn: &dyn Connection, raw: &[u8]) -> Result<()> {
        let (event, payload) = envelope::decode(raw)?.into_parts();

        let Some(handler) = self.registry.lookup(&event) else {
            return Err(DispatchError::UnrecognizedEvent(event));
        };

        let span = scope.span().clone();
        let ctx = DispatchContext::new(scope, conn, payload);
        handler
            .handle(ctx)
            .instrument(span)
            .await
            .map_err(DispatchError::Handler)
    }
}
