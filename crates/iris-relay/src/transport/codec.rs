//! Inbound frame classification.
//!
//! Text and binary frames are relay payloads and stay opaque. Ping/Pong/Close
//! are surfaced for lifecycle management and never relayed.

use axum::extract::ws::Message;
use bytes::Bytes;

use crate::relay::Frame;

#[derive(Debug)]
pub enum Inbound {
    Relay(Frame),
    Ping,
    Pong,
    Close,
}

pub fn decode(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Relay(Frame::Text(s)),
        Message::Binary(b) => Inbound::Relay(Frame::Binary(Bytes::from(b))),
        Message::Ping(_) => Inbound::Ping,
        Message::Pong(_) => Inbound::Pong,
        Message::Close(_) => Inbound::Close,
    }
}
