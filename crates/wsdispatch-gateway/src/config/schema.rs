use std::net::SocketAddr;

use serde::Deserialize;
use wsdispatch_core::DispatchError;

use crate::error::{GatewayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::UnsupportedVersion(self.version));
        }
        self.gateway.validate()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// HTTP path of the WebSocket endpoint.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Per-connection outbound queue depth.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    #[serde(default)]
    pub on_dispatch_error: DispatchErrorPolicy,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
            outbound_queue: default_outbound_queue(),
            on_dispatch_error: DispatchErrorPolicy::default(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') {
            return Err(GatewayError::Config("gateway.path must start with '/'".into()));
        }
        if !(1000..=120000).contains(&self.ping_interval_ms) {
            return Err(GatewayError::Config(
                "gateway.ping_interval_ms must be between 1000 and 120000".into(),
            ));
        }
        if !(1000..=600000).contains(&self.idle_timeout_ms) {
            return Err(GatewayError::Config(
                "gateway.idle_timeout_ms must be between 1000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(GatewayError::Config(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if self.max_frame_bytes == 0 {
            return Err(GatewayError::Config("gateway.max_frame_bytes must be > 0".into()));
        }
        if self.outbound_queue == 0 {
            return Err(GatewayError::Config("gateway.outbound_queue must be > 0".into()));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        Ok(self.listen.parse()?)
    }
}

/// What the connection loop does when `dispatch` returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchErrorPolicy {
    /// Close the connection on any dispatch error.
    #[default]
    Close,
    /// Keep reading after an unrecognized event; close on anything else.
    SkipUnrecognized,
}

impl DispatchErrorPolicy {
    pub fn should_close(self, err: &DispatchError) -> bool {
        match self {
            DispatchErrorPolicy::Close => true,
            DispatchErrorPolicy::SkipUnrecognized => !err.is_unrecognized_event(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:7777".into()
}
fn default_path() -> String {
    "/ws".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_max_frame_bytes() -> usize {
    64 * 1024
}
fn default_outbound_queue() -> usize {
    256
}
