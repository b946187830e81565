//! Broadcast relay: connection registry plus the fan-out engine.
//!
//! The relay is type-oblivious. Frames go out exactly as they came in, to
//! every open peer except the sender.

pub mod broadcast;
pub mod registry;
pub mod types;

pub use broadcast::{FanOut, PeerGuard, Relay};
pub use registry::{ConnId, ConnState, ConnectionRegistry, Peer};
pub use types::Frame;
