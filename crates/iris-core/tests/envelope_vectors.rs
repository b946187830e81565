//! Envelope decode vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use iris_core::protocol::{ControlCommand, Envelope, ImageStream};
use iris_core::IrisError;

mod vector_loader;
use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "control_start.json",
        "control_uppercase.json",
        "control_bad_command.json",
        "telemetry_partial.json",
        "image_raw_sized.json",
        "image_bev_bare.json",
        "steering.json",
        "steering_bad_value.json",
        "obstacle_partial.json",
        "unknown_type.json",
        "missing_type.json",
        "not_json.json",
    ];

    for f in files {
        let v = load(f);
        let res = Envelope::decode(&v.text);

        if v.expect_error {
            let e = res.expect_err(&v.description);
            assert!(matches!(e, IrisError::Decode(_)), "vector={} err={e}", v.description);
            continue;
        }

        let env = res.unwrap_or_else(|e| panic!("vector={} err={e}", v.description));
        let tag = v.expect_tag.expect("missing expect_tag");
        assert_eq!(env.tag(), tag, "vector={}", v.description);
    }
}

#[test]
fn control_command_parses_case_insensitively() {
    let env = Envelope::decode(&load("control_uppercase.json").text).unwrap();
    assert_eq!(env, Envelope::control(ControlCommand::ResetDistance));
}

#[test]
fn control_encodes_lowercase_snake_case() {
    let text = Envelope::control(ControlCommand::ResetDistance).encode().unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["type"], "control");
    assert_eq!(v["command"], "reset_distance");
}

#[test]
fn welcome_log_encodes_type_and_message() {
    let text = Envelope::log("Connected to WebSocket Server").encode().unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["type"], "log");
    assert_eq!(v["message"], "Connected to WebSocket Server");
}

#[test]
fn unknown_envelope_refuses_to_encode() {
    let env = Envelope::Unknown {
        kind: Some("lidar_scan".into()),
    };
    assert!(env.encode().is_err());
}

#[test]
fn non_object_json_is_unknown_not_error() {
    let env = Envelope::decode("42").unwrap();
    assert_eq!(env, Envelope::Unknown { kind: None });
}

#[test]
fn image_frame_resolution_and_data_uri() {
    let raw = Envelope::decode(&load("image_raw_sized.json").text).unwrap();
    let (stream, frame) = raw.image().unwrap();
    assert_eq!(stream, ImageStream::Raw);
    assert_eq!(frame.resolution(), Some((640, 480)));
    assert_eq!(frame.data_uri(), "data:image/jpeg;base64,/9j/4AAQ");

    let bev = Envelope::decode(&load("image_bev_bare.json").text).unwrap();
    let (stream, frame) = bev.image().unwrap();
    assert_eq!(stream, ImageStream::Bev);
    assert_eq!(frame.resolution(), None);
    assert_eq!(frame.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
}

#[test]
fn obstacle_maps_onto_obstacle_fields_only() {
    let env = Envelope::decode(&load("obstacle_partial.json").text).unwrap();
    let delta = env.telemetry_delta().unwrap();
    assert_eq!(delta.obstacle_detected, Some(true));
    assert_eq!(delta.obstacle_distance, Some(42.0));
    assert_eq!(delta.obstacle_position, None);
    assert_eq!(delta.speed, None);
    assert_eq!(delta.steering_angle, None);
}
