//! Startup / serving errors for the gateway binary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
    #[error("gateway.listen must be a valid socket address: {0}")]
    InvalidListen(#[from] std::net::AddrParseError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
