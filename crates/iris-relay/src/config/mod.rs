//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use iris_core::error::{IrisError, Result};

pub use schema::{RelayConfig, RelaySection, SlowPeerPolicy};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "IRIS_RELAY_CONFIG";
/// Config file used when the env var is unset.
pub const DEFAULT_CONFIG_PATH: &str = "iris-relay.yaml";

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| IrisError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| IrisError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path`, or fall back to built-in defaults when the file does not exist.
pub fn load_or_default(path: &str) -> Result<RelayConfig> {
    if Path::new(path).exists() {
        load_from_file(path)
    } else {
        tracing::info!(path, "config file not found, using defaults");
        let cfg = RelayConfig::default();
        cfg.validate()?;
        Ok(cfg)
    }
}
