use async_trait::async_trait;
use axum::extract::ws::Message;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wsdispatch_core::error::BoxError;
use wsdispatch_core::protocol::Frame;

use crate::dispatch::Connection;

#[derive(Debug, Error)]
#[error("connection closed")]
pub struct ConnectionClosed;

/// Handler-facing side of a connection: frames go onto the outbound queue
/// drained by the connection's writer task.
///
/// A write waiting on a full queue gives up as soon as `closed` is cancelled.
#[derive(Clone)]
pub struct OutboundConnection {
    tx: mpsc::Sender<Message>,
    closed: CancellationToken,
}

impl OutboundConnection {
    pub fn new(tx: mpsc::Sender<Message>, closed: CancellationToken) -> Self {
        Self { tx, closed }
    }
}

#[async_trait]
impl Connection for OutboundConnection {
    async fn write_frame(&self, frame: Frame) -> Result<(), BoxError> {
        let len = frame.len();
        // axum's Binary wants Vec<u8>, so the Bytes payload is copied once here.
        let msg = match frame {
            Frame::Text(s) => Message::Text(s),
            Frame::Binary(b) => Message::Binary(b.to_vec()),
        };

        let queued = tokio::select! {
            biased;
            _ = self.closed.cancelled() => false,
            r = self.tx.send(msg) => r.is_ok(),
        };
        if !queued {
            return Err(ConnectionClosed.into());
        }
        tracing::trace!(len, "frame queued");
        Ok(())
    }
}
