//! Test doubles shared by gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tokio::sync::Notify;

use wsdispatch_core::error::BoxError;
use wsdispatch_core::protocol::Frame;
use wsdispatch_gateway::dispatch::{Connection, DispatchContext, Handler};
use wsdispatch_gateway::transport::connection::ConnectionClosed;

/// Connection that records every written frame.
#[derive(Default)]
pub struct RecordingConnection {
    frames: Mutex<Vec<Frame>>,
}

impl RecordingConnection {
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .map(|f| String::from_utf8(f.as_bytes().to_vec()).unwrap())
            .collect()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn write_frame(&self, frame: Frame) -> Result<(), BoxError> {
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

/// Connection whose peer is already gone.
pub struct DeadConnection;

#[async_trait]
impl Connection for DeadConnection {
    async fn write_frame(&self, _frame: Frame) -> Result<(), BoxError> {
        Err(Box::new(ConnectionClosed))
    }
}

/// Handler that records how often it ran and with which payloads.
#[derive(Default)]
pub struct SpyHandler {
    calls: AtomicUsize,
    payloads: Mutex<Vec<Vec<u8>>>,
    saw_cancelled: Mutex<Vec<bool>>,
}

impl SpyHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn saw_cancelled(&self) -> Vec<bool> {
        self.saw_cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for SpyHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(ctx.payload_bytes().to_vec());
        self.saw_cancelled.lock().unwrap().push(ctx.scope().is_cancelled());
        Ok(())
    }
}

/// Replies with the raw payload as a text frame.
pub struct EchoPayloadHandler;

#[async_trait]
impl Handler for EchoPayloadHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        ctx.reply(Frame::Text(ctx.payload().get().to_string())).await
    }
}

/// Replies with the raw payload bytes as a binary frame, writing through the
/// connection handle directly.
pub struct BinaryEchoHandler;

#[async_trait]
impl Handler for BinaryEchoHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        let conn = ctx.conn();
        conn.write_frame(Frame::Binary(Bytes::copy_from_slice(ctx.payload_bytes())))
            .await
    }
}

#[derive(Deserialize)]
struct FloodRequest {
    frames: usize,
    size: usize,
}

/// Writes `frames` binary frames of `size` bytes each, stopping at the first
/// failed write.
#[derive(Default)]
pub struct FloodHandler {
    written: AtomicUsize,
}

impl FloodHandler {
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for FloodHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        let req: FloodRequest = ctx.parse_payload()?;
        let chunk = Bytes::from(vec![0xAB; req.size]);
        for _ in 0..req.frames {
            ctx.reply(Frame::Binary(chunk.clone())).await?;
            self.written.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Parks until its scope is cancelled, then signals `released`.
pub struct WaitForCancelHandler {
    pub released: Arc<Notify>,
}

#[async_trait]
impl Handler for WaitForCancelHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        ctx.scope().cancelled().await;
        self.released.notify_one();
        Ok(())
    }
}
