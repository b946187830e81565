#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use iris_core::IrisError;
use iris_relay::config::{self, SlowPeerPolicy};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
relay:
  listen: "0.0.0.0:8080"
  outbound_qeueu: 12 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, IrisError::BadRequest(_)), "{err}");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.relay.listen, "0.0.0.0:8080");
    assert_eq!(cfg.relay.path, "/");
    assert_eq!(cfg.relay.welcome, "Connected to WebSocket Server");
    assert_eq!(cfg.relay.slow_peer, SlowPeerPolicy::Drop);
    assert_eq!(cfg.relay.max_message_bytes, None);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
relay:
  listen: "127.0.0.1:9001"
  path: "/ws"
  welcome: "hello"
  outbound_queue: 32
  slow_peer: disconnect
  ping_interval_ms: 5000
  idle_timeout_ms: 15000
  max_message_bytes: 4194304
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.relay.listen_addr().unwrap().port(), 9001);
    assert_eq!(cfg.relay.slow_peer, SlowPeerPolicy::Disconnect);
    assert_eq!(cfg.relay.max_message_bytes, Some(4 * 1024 * 1024));
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, IrisError::UnsupportedVersion));
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 1\nrelay:\n  listen: \"not-an-addr\"\n",
        "version: 1\nrelay:\n  path: \"ws\"\n",
        "version: 1\nrelay:\n  path: \"/metrics\"\n",
        "version: 1\nrelay:\n  outbound_queue: 0\n",
        "version: 1\nrelay:\n  ping_interval_ms: 30000\n  idle_timeout_ms: 20000\n",
        "version: 1\nrelay:\n  max_message_bytes: 0\n",
        "version: 1\nrelay:\n  slow_peer: block\n",
        "version: 1\nrelay:\n  drain_grace_ms: 120000\n",
    ];
    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert!(matches!(err, IrisError::BadRequest(_)), "case={case} err={err}");
    }
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = config::load_or_default("definitely/not/here/iris-relay.yaml").expect("defaults");
    assert_eq!(cfg.relay.listen, "0.0.0.0:8080");
}
