//! Inbound envelope (JSON).
//!
//! `payload` is stored as `RawValue`: the bytes a handler sees are exactly the
//! bytes the client sent for that field.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{DispatchError, Result};

/// `{ "type": "<event>", "payload": <any JSON> }`
///
/// Unknown top-level fields are ignored.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Event name (field name is `type` in JSON). Matched exactly against the registry.
    #[serde(rename = "type")]
    pub event: String,
    /// Handler-specific payload, not parsed here.
    pub payload: Box<RawValue>,
}

impl Envelope {
    pub fn into_parts(self) -> (String, Box<RawValue>) {
        (self.event, self.payload)
    }
}

/// Decode one raw frame into an envelope.
pub fn decode(raw: &[u8]) -> Result<Envelope> {
    // serde would also accept `["ping", {}]` for a struct; the envelope is object-only.
    if raw.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{') {
        return Err(DispatchError::Decode("envelope must be a json object".into()));
    }
    let env: Envelope = serde_json::from_slice(raw)
        .map_err(|e| DispatchError::Decode(format!("invalid envelope json: {e}")))?;
    if env.event.is_empty() {
        return Err(DispatchError::Decode("envelope type must not be empty".into()));
    }
    Ok(env)
}
