//! Dispatch error surface shared across wsDispatch crates.

use thiserror::Error;

/// Error type handlers return; the dispatcher hands it back untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Frame is not a valid envelope.
    DecodeError,
    /// No handler registered for the envelope type.
    UnrecognizedEvent,
    /// The handler itself failed.
    HandlerError,
}

impl ClientCode {
    /// String representation used in close reasons and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::DecodeError => "DECODE_ERROR",
            ClientCode::UnrecognizedEvent => "UNRECOGNIZED_EVENT",
            ClientCode::HandlerError => "HANDLER_ERROR",
        }
    }

    /// WebSocket close code (RFC 6455 §7.4.1) sent when a connection is closed
    /// because of this error.
    pub fn close_code(self) -> u16 {
        match self {
            // invalid frame payload data
            ClientCode::DecodeError => 1007,
            // policy violation
            ClientCode::UnrecognizedEvent => 1008,
            // internal error
            ClientCode::HandlerError => 1011,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Everything that can go wrong while routing one inbound frame.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The frame is not a JSON object with a non-empty `type` and a `payload`.
    #[error("decode failed: {0}")]
    Decode(String),
    /// No handler is registered for the envelope's `type`.
    #[error("unrecognized event type: {0}")]
    UnrecognizedEvent(String),
    /// The handler returned an error; kept as-is for `source()` and downcasts.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),
}

impl DispatchError {
    /// Map to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DispatchError::Decode(_) => ClientCode::DecodeError,
            DispatchError::UnrecognizedEvent(_) => ClientCode::UnrecognizedEvent,
            DispatchError::Handler(_) => ClientCode::HandlerError,
        }
    }

    /// True when no handler matched; the only error the skip policy tolerates.
    pub fn is_unrecognized_event(&self) -> bool {
        matches!(self, DispatchError::UnrecognizedEvent(_))
    }

    /// The handler's own error, when the failure came from a handler.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DispatchError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
