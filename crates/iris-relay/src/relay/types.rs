use axum::extract::ws::Message;
use bytes::Bytes;

/// One relayed payload, kept in its original framing.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    pub fn len(&self) -> usize {
        match self {
            Frame::Text(s) => s.len(),
            Frame::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Text(_) => "text",
            Frame::Binary(_) => "binary",
        }
    }

    /// Convert to axum::ws::Message for one destination.
    /// NOTE: axum's Message owns its buffer, so every destination gets a copy.
    pub fn to_ws_message(&self) -> Message {
        match self {
            Frame::Text(s) => Message::Text(s.clone()),
            Frame::Binary(b) => Message::Binary(b.to_vec()),
        }
    }
}
