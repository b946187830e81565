use std::net::SocketAddr;

use serde::Deserialize;
use iris_core::error::{IrisError, Result};

/// Paths served by the ops endpoints; the WebSocket route may not shadow them.
const RESERVED_PATHS: [&str; 3] = ["/healthz", "/readyz", "/metrics"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            relay: RelaySection::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(IrisError::UnsupportedVersion);
        }
        self.relay.validate()
    }
}

/// What to do when a peer's outbound queue is full during fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlowPeerPolicy {
    /// Skip this message for that peer only.
    #[default]
    Drop,
    /// Close the peer.
    Disconnect,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// WebSocket route.
    #[serde(default = "default_path")]
    pub path: String,

    /// Text of the `log` envelope unicast to every new peer.
    #[serde(default = "default_welcome")]
    pub welcome: String,

    /// Per-peer outbound queue capacity (messages).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    #[serde(default)]
    pub slow_peer: SlowPeerPolicy,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Transport message ceiling. Unset keeps the transport default.
    #[serde(default)]
    pub max_message_bytes: Option<usize>,

    /// How long `/readyz` reports draining before the listener stops.
    #[serde(default)]
    pub drain_grace_ms: u64,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            welcome: default_welcome(),
            outbound_queue: default_outbound_queue(),
            slow_peer: SlowPeerPolicy::default(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            max_message_bytes: None,
            drain_grace_ms: 0,
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') {
            return Err(IrisError::BadRequest("relay.path must start with '/'".into()));
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(IrisError::BadRequest(format!(
                "relay.path must not be one of {RESERVED_PATHS:?}"
            )));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(IrisError::BadRequest(
                "relay.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(IrisError::BadRequest(
                "relay.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(IrisError::BadRequest(
                "relay.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(IrisError::BadRequest(
                "relay.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if self.max_message_bytes == Some(0) {
            return Err(IrisError::BadRequest(
                "relay.max_message_bytes must be positive when set".into(),
            ));
        }
        if self.drain_grace_ms > 60000 {
            return Err(IrisError::BadRequest(
                "relay.drain_grace_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            IrisError::BadRequest(format!("relay.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_path() -> String {
    "/".into()
}
fn default_welcome() -> String {
    "Connected to WebSocket Server".into()
}
fn default_outbound_queue() -> usize {
    256
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
