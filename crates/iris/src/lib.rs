//! Top-level facade crate for IRIS.
//!
//! Re-exports the core types and the relay library so users can depend on a single crate.

pub mod core {
    pub use iris_core::*;
}

pub mod relay {
    pub use iris_relay::*;
}
