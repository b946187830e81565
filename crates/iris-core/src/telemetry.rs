//! Telemetry snapshot and the partial-update merge that maintains it.
//!
//! Merge contract:
//! - a field present in the delta overwrites the snapshot, including falsy
//!   values such as `false` or `0.0`;
//! - a field absent from the delta (or sent as `null`) keeps its value;
//! - the snapshot is never replaced wholesale.

use serde::{Deserialize, Serialize};

/// Placeholder text for string fields nobody has reported yet.
pub const UNKNOWN: &str = "Unknown";

/// Latest known telemetry. Field names on the wire follow the dashboard's
/// historical mixed casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub steering_angle: f64,
    #[serde(rename = "laneStatus")]
    pub lane_status: String,
    pub speed: f64,
    #[serde(rename = "robotPosition")]
    pub robot_position: String,
    #[serde(rename = "laneWidth")]
    pub lane_width: f64,
    pub deviation: f64,
    #[serde(rename = "obstacleDetected")]
    pub obstacle_detected: bool,
    #[serde(rename = "obstacleDistance")]
    pub obstacle_distance: f64,
    #[serde(rename = "obstaclePosition")]
    pub obstacle_position: String,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            steering_angle: 0.0,
            lane_status: UNKNOWN.into(),
            speed: 0.0,
            robot_position: UNKNOWN.into(),
            lane_width: 0.0,
            deviation: 0.0,
            obstacle_detected: false,
            obstacle_distance: 0.0,
            obstacle_position: UNKNOWN.into(),
        }
    }
}

/// Names of snapshot fields, used to report what a merge touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    SteeringAngle,
    LaneStatus,
    Speed,
    RobotPosition,
    LaneWidth,
    Deviation,
    ObstacleDetected,
    ObstacleDistance,
    ObstaclePosition,
}

impl TelemetryField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            TelemetryField::SteeringAngle => "steering_angle",
            TelemetryField::LaneStatus => "laneStatus",
            TelemetryField::Speed => "speed",
            TelemetryField::RobotPosition => "robotPosition",
            TelemetryField::LaneWidth => "laneWidth",
            TelemetryField::Deviation => "deviation",
            TelemetryField::ObstacleDetected => "obstacleDetected",
            TelemetryField::ObstacleDistance => "obstacleDistance",
            TelemetryField::ObstaclePosition => "obstaclePosition",
        }
    }
}

/// Partial update. `None` means "not sent"; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_angle: Option<f64>,
    #[serde(rename = "laneStatus", default, skip_serializing_if = "Option::is_none")]
    pub lane_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(rename = "robotPosition", default, skip_serializing_if = "Option::is_none")]
    pub robot_position: Option<String>,
    #[serde(rename = "laneWidth", default, skip_serializing_if = "Option::is_none")]
    pub lane_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
    #[serde(rename = "obstacleDetected", default, skip_serializing_if = "Option::is_none")]
    pub obstacle_detected: Option<bool>,
    #[serde(rename = "obstacleDistance", default, skip_serializing_if = "Option::is_none")]
    pub obstacle_distance: Option<f64>,
    #[serde(rename = "obstaclePosition", default, skip_serializing_if = "Option::is_none")]
    pub obstacle_position: Option<String>,
}

impl TelemetryDelta {
    pub fn is_empty(&self) -> bool {
        *self == TelemetryDelta::default()
    }
}

fn apply<T>(slot: &mut T, value: Option<T>, field: TelemetryField, touched: &mut Vec<TelemetryField>) {
    if let Some(v) = value {
        *slot = v;
        touched.push(field);
    }
}

impl TelemetrySnapshot {
    /// Fold `delta` into the snapshot in place.
    ///
    /// Returns the fields that were present in the delta, in declaration
    /// order, so a renderer can redraw only what changed.
    pub fn merge(&mut self, delta: TelemetryDelta) -> Vec<TelemetryField> {
        use TelemetryField as F;

        let mut touched = Vec::new();
        apply(&mut self.steering_angle, delta.steering_angle, F::SteeringAngle, &mut touched);
        apply(&mut self.lane_status, delta.lane_status, F::LaneStatus, &mut touched);
        apply(&mut self.speed, delta.speed, F::Speed, &mut touched);
        apply(&mut self.robot_position, delta.robot_position, F::RobotPosition, &mut touched);
        apply(&mut self.lane_width, delta.lane_width, F::LaneWidth, &mut touched);
        apply(&mut self.deviation, delta.deviation, F::Deviation, &mut touched);
        apply(&mut self.obstacle_detected, delta.obstacle_detected, F::ObstacleDetected, &mut touched);
        apply(&mut self.obstacle_distance, delta.obstacle_distance, F::ObstacleDistance, &mut touched);
        apply(&mut self.obstacle_position, delta.obstacle_position, F::ObstaclePosition, &mut touched);
        touched
    }

    /// Steering gauge geometry for the stored (raw) angle.
    pub fn steering_gauge(&self) -> SteeringGauge {
        SteeringGauge::from_angle(self.steering_angle)
    }
}

/// Half-circumference of the dashboard's steering arc, in SVG user units.
pub const GAUGE_ARC_LENGTH: f64 = 125.6;

/// Presentation values for the steering gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringGauge {
    /// Angle clamped to [-90, 90] degrees; also the needle rotation.
    pub clamped: f64,
    /// Stroke dash offset of the arc.
    pub dash_offset: f64,
}

impl SteeringGauge {
    pub fn from_angle(angle: f64) -> Self {
        // NaN would otherwise slip through `clamp`.
        let clamped = if angle.is_nan() { 0.0 } else { angle.clamp(-90.0, 90.0) };
        Self {
            clamped,
            dash_offset: GAUGE_ARC_LENGTH - (clamped / 90.0) * GAUGE_ARC_LENGTH,
        }
    }
}
