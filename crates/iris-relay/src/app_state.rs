//! Shared application state for the relay.

use std::sync::Arc;

use iris_core::error::Result;

use crate::config::RelayConfig;
use crate::obs::metrics::RelayMetrics;
use crate::relay::Relay;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    relay: Arc<Relay>,
    metrics: Arc<RelayMetrics>,
}

struct AppStateInner {
    cfg: RelayConfig,
}

impl AppState {
    /// Build application state from a config, validating it first.
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(RelayMetrics::default());
        let relay = Arc::new(Relay::new(cfg.relay.slow_peer, Arc::clone(&metrics)));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            relay,
            metrics,
        })
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn relay(&self) -> Arc<Relay> {
        Arc::clone(&self.relay)
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }
}
