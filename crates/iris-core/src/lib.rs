//! IRIS core: wire envelopes, telemetry state, and the consumer-side
//! dashboard reducer shared by the relay and its clients.
//!
//! This crate carries no transport or runtime dependencies. The relay only
//! needs the error type and the welcome envelope from here; everything else
//! is used by peers that actually interpret the stream.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed traffic
//! surfaces as `IrisError` so a bad message never takes a consumer down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod dashboard;
pub mod error;
pub mod protocol;
pub mod telemetry;

/// Shared result type.
pub use error::{IrisError, Result};
