use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::error::TrySendError;

use crate::config::SlowPeerPolicy;
use crate::obs::metrics::RelayMetrics;
use crate::relay::registry::{ConnId, ConnectionRegistry, Peer};
use crate::relay::types::Frame;

/// Outcome of one fan-out round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    /// Queued for delivery.
    pub delivered: usize,
    /// Skipped because the peer's queue was full.
    pub dropped: usize,
    /// Peers closed during this round (queue gone, or slow-peer disconnect).
    pub closed: usize,
}

/// Relay core: owns the registry and floods frames to every other open peer.
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RelayMetrics>,
    slow_peer: SlowPeerPolicy,
}

impl Relay {
    pub fn new(slow_peer: SlowPeerPolicy, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            metrics,
            slow_peer,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register `peer` for the lifetime of the returned guard.
    pub fn attach(&self, peer: Arc<Peer>) -> PeerGuard {
        let id = peer.id();
        if self.registry.register(peer) {
            self.metrics.connections.inc(&[]);
            self.metrics.active_peers.inc(&[]);
        }
        PeerGuard {
            registry: Arc::clone(&self.registry),
            metrics: Arc::clone(&self.metrics),
            id,
        }
    }

    /// Forward `frame` from `from` to every other open peer.
    ///
    /// Never awaits: each destination gets a `try_send` into its own queue,
    /// and a failure on one destination does not affect the others.
    pub fn fan_out(&self, from: ConnId, frame: &Frame) -> FanOut {
        let started = Instant::now();
        self.metrics.messages_in.inc(&[("kind", frame.kind())]);

        let mut out = FanOut::default();
        for peer in self.registry.all() {
            if peer.id() == from || !peer.is_open() {
                continue;
            }
            match peer.tx.try_send(frame.to_ws_message()) {
                Ok(()) => {
                    out.delivered += 1;
                    self.metrics.deliveries.inc(&[("outcome", "sent")]);
                }
                Err(TrySendError::Full(_)) => match self.slow_peer {
                    SlowPeerPolicy::Drop => {
                        out.dropped += 1;
                        self.metrics.deliveries.inc(&[("outcome", "dropped")]);
                        tracing::debug!(peer = %peer.id(), "outbound queue full, message dropped");
                    }
                    SlowPeerPolicy::Disconnect => {
                        out.closed += 1;
                        self.close_peer(&peer, "slow_peer");
                    }
                },
                Err(TrySendError::Closed(_)) => {
                    out.closed += 1;
                    self.close_peer(&peer, "send_failed");
                }
            }
        }

        self.metrics.fanout_duration.observe(&[], started.elapsed());
        out
    }

    /// Unregister `peer` now and tell its session task to wind down.
    fn close_peer(&self, peer: &Peer, reason: &'static str) {
        peer.request_close();
        if self.registry.unregister(peer.id()).is_some() {
            self.metrics.active_peers.dec(&[]);
            self.metrics.disconnects.inc(&[("reason", reason)]);
        }
        self.metrics.deliveries.inc(&[("outcome", "closed")]);
        tracing::warn!(peer = %peer.id(), addr = %peer.addr(), reason, "peer closed during fan-out");
    }
}

/// Keeps a peer registered; unregisters it on drop.
pub struct PeerGuard {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RelayMetrics>,
    id: ConnId,
}

impl PeerGuard {
    pub fn id(&self) -> ConnId {
        self.id
    }
}

impl Drop for PeerGuard {
    fn drop(&mut self) {
        if self.registry.unregister(self.id).is_some() {
            self.metrics.active_peers.dec(&[]);
            self.metrics.disconnects.inc(&[("reason", "session_end")]);
        }
    }
}
