//! Shared error type across IRIS crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, IrisError>;

/// Unified error type used by core and relay.
#[derive(Debug, Error)]
pub enum IrisError {
    /// Invalid configuration or request.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Config file declares a version this build does not understand.
    #[error("unsupported config version")]
    UnsupportedVersion,
    /// A single message could not be decoded. Recoverable per message.
    #[error("decode failed: {0}")]
    Decode(String),
    /// The listening socket could not be bound. Fatal at startup.
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}
