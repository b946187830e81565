//! IRIS relay library entry.
//!
//! Wires config, the connection registry and fan-out core, the WebSocket
//! transport, and ops endpoints into one server. Consumed by the binary
//! (`main.rs`) and by integration tests.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod relay;
pub mod router;
pub mod server;
pub mod transport;
