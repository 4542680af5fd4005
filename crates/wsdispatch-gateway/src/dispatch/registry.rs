use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use wsdispatch_core::error::BoxError;

use super::context::DispatchContext;

/// One event handler. Exactly one runs per dispatched frame.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError>;
}

/// Event name -> handler. Exact, case-sensitive keys; last registration wins.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, event: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(event.into(), handler);
    }

    pub fn lookup(&self, event: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(event).map(|e| Arc::clone(e.value()))
    }

    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        events.sort();
        events
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
