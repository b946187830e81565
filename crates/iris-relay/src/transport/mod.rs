//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler and the codec that sorts incoming frames
//! into relay payloads and transport control.

pub mod codec;
pub mod ws;
