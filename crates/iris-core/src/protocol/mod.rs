//! Wire protocol (JSON text envelopes tagged by `type`).
//!
//! The relay never looks inside these; they exist for the peers on either
//! end. Decoding is panic-free: bad input becomes `IrisError::Decode`, and an
//! unrecognised tag becomes `Envelope::Unknown` rather than an error.

pub mod envelope;

pub use envelope::{ControlCommand, Envelope, ImageFrame, ImageStream, ObstacleReport};
