//! JSON test vector loader shared by envelope tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EnvelopeVector {
    pub description: String,
    /// Exact text frame as it would arrive from the relay.
    pub text: String,
    #[serde(default)]
    pub expect_tag: Option<String>,
    #[serde(default)]
    pub expect_error: bool,
}

pub fn load(name: &str) -> EnvelopeVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("missing vector {name}: {e}"));
    serde_json::from_str(&s).expect("invalid test vector")
}
