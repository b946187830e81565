//! Lightweight in-process metrics, rendered by the `/metrics` handler in
//! Prometheus text format. Stored as atomics behind `DashMap` label sets.

pub mod metrics;
