//! Per-invocation context handed to handlers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;
use tracing::Span;

use wsdispatch_core::error::BoxError;
use wsdispatch_core::protocol::Frame;

/// Write side of a live connection, as seen from a handler.
///
/// Implemented by the transport; handlers only ever borrow it.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn write_frame(&self, frame: Frame) -> Result<(), BoxError>;
}

/// Cancellation + trace scope threaded in by the connection loop.
///
/// `background()` is a root scope with no parent token and no span, for callers
/// that have nothing better (tests, one-off tools).
#[derive(Debug, Clone)]
pub struct Scope {
    cancel: CancellationToken,
    span: Span,
}

impl Scope {
    pub fn new(cancel: CancellationToken, span: Span) -> Self {
        Self { cancel, span }
    }

    pub fn background() -> Self {
        Self {
            cancel: CancellationToken::new(),
            span: Span::none(),
        }
    }

    /// Derive a scope whose token is cancelled with this one.
    pub fn child(&self, span: Span) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the peer closes, a write fails, the idle timeout fires,
    /// or the connection loop exits.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Everything one handler invocation gets: scope, connection, raw payload.
pub struct DispatchContext<'a> {
    scope: Scope,
    conn: &'a dyn Connection,
    payload: Box<RawValue>,
}

impl<'a> DispatchContext<'a> {
    pub fn new(scope: Scope, conn: &'a dyn Connection, payload: Box<RawValue>) -> Self {
        Self {
            scope,
            conn,
            payload,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn conn(&self) -> &'a dyn Connection {
        self.conn
    }

    /// Raw payload exactly as received.
    pub fn payload(&self) -> &RawValue {
        &self.payload
    }

    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.get().as_bytes()
    }

    /// Parse the payload with the handler's own schema.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(self.payload.get())
    }

    /// Write a frame back to the originating connection.
    pub async fn reply(&self, frame: Frame) -> Result<(), BoxError> {
        self.conn.write_frame(frame).await
    }
}
