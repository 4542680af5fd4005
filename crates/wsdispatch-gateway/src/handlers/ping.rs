use async_trait::async_trait;
use serde_json::json;

use wsdispatch_core::error::BoxError;
use wsdispatch_core::protocol::Frame;

use crate::dispatch::{DispatchContext, Handler};

/// `ping` -> `{"type":"pong"}`. Payload is ignored.
#[derive(Debug, Default)]
pub struct PingHandler;

impl PingHandler {
    pub const EVENT: &'static str = "ping";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        tracing::debug!("ping received");
        ctx.reply(Frame::json(&json!({ "type": "pong" }))?).await
    }
}
