//! Frame classification for the connection loop.
//!
//! - Text and Binary frames => raw bytes for the dispatcher (no parsing here)
//! - Ping/Pong/Close are surfaced for lifecycle management

use std::borrow::Cow;

use axum::extract::ws::{CloseFrame, Message};
use wsdispatch_core::ClientCode;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Data(Vec<u8>),
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Data(s.into_bytes()),
        Message::Binary(b) => Inbound::Data(b),
        Message::Ping(v) => Inbound::Ping(v),
        Message::Pong(_) => Inbound::Pong,
        Message::Close(_) => Inbound::Close,
    }
}

/// Close frame sent when a dispatch error ends the connection.
pub fn close_for(code: ClientCode) -> Message {
    Message::Close(Some(CloseFrame {
        code: code.close_code(),
        reason: Cow::Borrowed(code.as_str()),
    }))
}

/// Close frame for an idle connection (1001 going away).
pub fn close_idle() -> Message {
    Message::Close(Some(CloseFrame {
        code: 1001,
        reason: Cow::Borrowed("IDLE_TIMEOUT"),
    }))
}
