#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::{Duration, Instant};

use iris_core::dashboard::{Applied, Dashboard, FrameRate, LOG_CAPACITY};
use iris_core::protocol::{ControlCommand, ImageStream};
use iris_core::telemetry::TelemetryField;

#[test]
fn unknown_type_leaves_state_unchanged() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);
    dash.handle_text(r#"{"type":"telemetry","data":{"speed":4.0}}"#, now);
    let before = dash.telemetry.clone();

    let applied = dash.handle_text(r#"{"type":"lidar_scan","speed":99}"#, now);

    assert_eq!(
        applied,
        Some(Applied::Ignored {
            kind: Some("lidar_scan".into())
        })
    );
    assert_eq!(dash.telemetry, before);
    assert_eq!(dash.unknown_count(), 1);
}

#[test]
fn malformed_payload_is_discarded_and_stream_continues() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);

    assert_eq!(dash.handle_text("{not json", now), None);
    assert_eq!(dash.handle_text(r#"{"type":"steering_angle","value":"x"}"#, now), None);
    assert_eq!(dash.malformed_count(), 2);

    let applied = dash.handle_text(r#"{"type":"steering_angle","value":7.5}"#, now);
    assert_eq!(applied, Some(Applied::Telemetry(vec![TelemetryField::SteeringAngle])));
    assert_eq!(dash.telemetry.steering_angle, 7.5);
}

#[test]
fn obstacle_clear_overwrites_detected() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);
    dash.handle_text(r#"{"type":"obstacle","detected":true,"distance":20,"position":"right"}"#, now);
    assert!(dash.telemetry.obstacle_detected);

    dash.handle_text(r#"{"type":"obstacle","detected":false}"#, now);
    assert!(!dash.telemetry.obstacle_detected);
    assert_eq!(dash.telemetry.obstacle_distance, 20.0);
    assert_eq!(dash.telemetry.obstacle_position, "right");
}

#[test]
fn frames_update_stream_view() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);

    let applied = dash.handle_text(r#"{"type":"image_processed","data":"AAAA","width":320,"height":240}"#, now);
    assert_eq!(
        applied,
        Some(Applied::Frame {
            stream: ImageStream::Processed,
            resolution: Some((320, 240))
        })
    );
    // A later frame without size keeps the last known resolution.
    dash.handle_text(r#"{"type":"image_processed","data":"BBBB"}"#, now);

    assert_eq!(dash.processed.resolution, Some((320, 240)));
    assert_eq!(dash.processed.last_frame.as_deref(), Some("data:image/jpeg;base64,BBBB"));
    assert_eq!(dash.processed.rate.total(), 2);
    assert_eq!(dash.raw.rate.total(), 0);
}

#[test]
fn control_and_log_are_reported() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);

    assert_eq!(
        dash.handle_text(r#"{"type":"control","command":"stop"}"#, now),
        Some(Applied::Control(ControlCommand::Stop))
    );
    assert_eq!(
        dash.handle_text(r#"{"type":"log","message":"Connected to WebSocket Server"}"#, now),
        Some(Applied::Log("Connected to WebSocket Server".into()))
    );
    assert_eq!(dash.log_lines().collect::<Vec<_>>(), vec!["Connected to WebSocket Server"]);
}

#[test]
fn log_is_bounded() {
    let now = Instant::now();
    let mut dash = Dashboard::new(now);
    for i in 0..LOG_CAPACITY + 5 {
        dash.handle_text(&format!(r#"{{"type":"log","message":"line {i}"}}"#), now);
    }
    let lines: Vec<_> = dash.log_lines().collect();
    assert_eq!(lines.len(), LOG_CAPACITY);
    assert_eq!(lines[0], "line 5");
}

#[test]
fn frame_rate_reports_completed_windows() {
    let start = Instant::now();
    let mut rate = FrameRate::new(start);
    for i in 0..30 {
        rate.tick(start + Duration::from_millis(i * 30));
    }
    assert_eq!(rate.fps(start + Duration::from_millis(900)), 0);
    assert_eq!(rate.fps(start + Duration::from_secs(1)), 30);
    // Next window is empty.
    assert_eq!(rate.fps(start + Duration::from_secs(2)), 0);
    assert_eq!(rate.total(), 30);
}
