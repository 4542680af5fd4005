//! Shared application state for the wsDispatch gateway.
//!
//! Owns the config and the single `Dispatcher`; built-in handlers are registered
//! here, before any listener is bound.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::handlers::{FizzHandler, PingHandler};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    conn_seq: AtomicU64,
}

impl AppState {
    /// Build state with the built-in handlers registered.
    pub fn new(cfg: GatewayConfig) -> Self {
        let dispatcher = Dispatcher::new();
        dispatcher.register(PingHandler::EVENT, Arc::new(PingHandler::new()));
        dispatcher.register(FizzHandler::EVENT, Arc::new(FizzHandler::new()));
        Self::with_dispatcher(cfg, dispatcher)
    }

    /// Build state around a caller-assembled dispatcher.
    pub fn with_dispatcher(cfg: GatewayConfig, dispatcher: Dispatcher) -> Self {
        tracing::info!(events = ?dispatcher.registry().events(), "handlers registered");
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                conn_seq: AtomicU64::new(1),
            }),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn next_connection_id(&self) -> u64 {
        self.inner.conn_seq.fetch_add(1, Ordering::Relaxed)
    }
}
