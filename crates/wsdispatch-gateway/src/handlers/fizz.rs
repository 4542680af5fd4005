use async_trait::async_trait;
use serde_json::json;

use wsdispatch_core::error::BoxError;
use wsdispatch_core::protocol::Frame;

use crate::dispatch::{DispatchContext, Handler};

/// `fizz` -> `{"type":"buzz"}`.
#[derive(Debug, Default)]
pub struct FizzHandler;

impl FizzHandler {
    pub const EVENT: &'static str = "fizz";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for FizzHandler {
    async fn handle(&self, ctx: DispatchContext<'_>) -> Result<(), BoxError> {
        tracing::debug!("fizz received");
        ctx.reply(Frame::json(&json!({ "type": "buzz" }))?).await
    }
}
