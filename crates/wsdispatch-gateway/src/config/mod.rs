//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{GatewayError, Result};

pub use schema::{DispatchErrorPolicy, GatewayConfig, GatewaySection};

pub const DEFAULT_PATH: &str = "wsdispatch.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        GatewayError::Config(format!("read config failed ({}): {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if given. Otherwise load `wsdispatch.yaml`, falling back to
/// built-in defaults when that file does not exist.
pub fn load(path: Option<&str>) -> Result<GatewayConfig> {
    if let Some(p) = path {
        return load_from_file(p);
    }
    match fs::read_to_string(DEFAULT_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = DEFAULT_PATH, "config file not found, using defaults");
            Ok(GatewayConfig::default())
        }
        Err(e) => Err(GatewayError::Config(format!(
            "read config failed ({DEFAULT_PATH}): {e}"
        ))),
    }
}
