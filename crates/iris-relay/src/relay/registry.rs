use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{mpsc, Notify};

/// Identity assigned at accept time. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl ConnState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ConnState::Open,
            1 => ConnState::Closing,
            _ => ConnState::Closed,
        }
    }
}

/// Handle to one open peer: its outbound queue plus lifecycle state.
pub struct Peer {
    id: ConnId,
    addr: SocketAddr,
    pub tx: mpsc::Sender<Message>,
    state: AtomicU8,
    close_requested: Notify,
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("state", &self.state())
            .finish()
    }
}

impl Peer {
    pub fn new(id: ConnId, addr: SocketAddr, tx: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            addr,
            tx,
            state: AtomicU8::new(ConnState::Open as u8),
            close_requested: Notify::new(),
        }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Remote address, diagnostic only.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> ConnState {
        ConnState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnState::Open
    }

    /// Move forward in the lifecycle. Never moves backwards.
    pub fn advance(&self, to: ConnState) {
        self.state.fetch_max(to as u8, Ordering::AcqRel);
    }

    /// Ask the owning session task to close this peer.
    pub fn request_close(&self) {
        self.advance(ConnState::Closing);
        self.close_requested.notify_one();
    }

    /// Resolves once `request_close` has been called.
    pub async fn close_requested(&self) {
        self.close_requested.notified().await
    }
}

/// Live peers, keyed by connection id.
///
/// All operations are safe under concurrent use; `all()` returns an owned
/// snapshot so callers can iterate while peers come and go.
pub struct ConnectionRegistry {
    peers: DashMap<ConnId, Arc<Peer>>,
    seq: AtomicU64,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Allocate a fresh connection id.
    pub fn next_id(&self) -> ConnId {
        ConnId(self.seq.fetch_add(1, Ordering::Relaxed))
    }

    /// Add a peer. Returns false (and changes nothing) if the id is present.
    pub fn register(&self, peer: Arc<Peer>) -> bool {
        let mut inserted = false;
        self.peers.entry(peer.id()).or_insert_with(|| {
            inserted = true;
            peer
        });
        inserted
    }

    /// Remove a peer and mark it closed. Absent ids are a no-op.
    pub fn unregister(&self, id: ConnId) -> Option<Arc<Peer>> {
        let (_, peer) = self.peers.remove(&id)?;
        peer.advance(ConnState::Closed);
        Some(peer)
    }

    /// Snapshot of the live set. Order is unspecified.
    pub fn all(&self) -> Vec<Arc<Peer>> {
        self.peers.iter().map(|e| Arc::clone(e.value())).collect()
    }

    pub fn get(&self, id: ConnId) -> Option<Arc<Peer>> {
        self.peers.get(&id).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, id: ConnId) -> bool {
        self.peers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
